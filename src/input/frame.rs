// Reassembles the serial byte stream into CR/LF terminated lines

/// Line buffer capacity in bytes; anything past it is dropped
pub const FRAME_CAPACITY: usize = 127;

/// Fixed-capacity line buffer. Feed it one byte at a time.
pub struct FrameAssembler<const N: usize = FRAME_CAPACITY> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FrameAssembler<N> {
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// Process a single incoming byte. Returns the completed line on a
    /// terminator if anything was accumulated.
    pub fn push(&mut self, byte: u8) -> Option<&[u8]> {
        match byte {
            b'\n' | b'\r' => {
                if self.len == 0 {
                    return None;
                }
                let len = self.len;
                self.len = 0;
                Some(&self.buf[..len])
            }
            _ => {
                // Overflowing bytes are silently discarded until the next terminator
                if self.len < N {
                    self.buf[self.len] = byte;
                    self.len += 1;
                }
                None
            }
        }
    }

    /// Bytes accumulated towards the current line
    pub fn pending(&self) -> usize {
        self.len
    }
}

impl<const N: usize> Default for FrameAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<const N: usize>(asm: &mut FrameAssembler<N>, bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        for &b in bytes {
            if let Some(frame) = asm.push(b) {
                frames.push(frame.to_vec());
            }
        }
        frames
    }

    #[test]
    fn test_single_line() {
        let mut asm: FrameAssembler = FrameAssembler::new();
        let frames = collect(&mut asm, b"0.1,0.2,0.3\n");
        assert_eq!(frames, vec![b"0.1,0.2,0.3".to_vec()]);
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn test_crlf_and_empty_lines_emit_nothing_extra() {
        let mut asm: FrameAssembler = FrameAssembler::new();
        let frames = collect(&mut asm, b"\r\n\n1,2,3\r\n\r\n4,5,6\n");
        assert_eq!(frames, vec![b"1,2,3".to_vec(), b"4,5,6".to_vec()]);
    }

    #[test]
    fn test_split_across_reads() {
        let mut asm: FrameAssembler = FrameAssembler::new();
        assert!(collect(&mut asm, b"0.5,").is_empty());
        assert_eq!(asm.pending(), 4);
        let frames = collect(&mut asm, b"0,1\n");
        assert_eq!(frames, vec![b"0.5,0,1".to_vec()]);
    }

    #[test]
    fn test_overflow_truncates_silently() {
        let mut asm = FrameAssembler::<4>::new();
        let frames = collect(&mut asm, b"abcdefgh\nxy\n");
        assert_eq!(frames, vec![b"abcd".to_vec(), b"xy".to_vec()]);
    }
}
