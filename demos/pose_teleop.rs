// Keyboard pose sender: A/D roll, W/S pitch, R/F height, Space recenter, Q quit
//
// Usage: cargo run --example pose_teleop -- [port]
//
// Writes "<roll>,<pitch>,<height>\n" frames to the controller at ~50 Hz.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::Write;
use std::time::Duration;
use tracing::info;

use stewart_platform_runtime::config::{SERIAL_BAUDRATE, SERIAL_PORT};

const STEP: f32 = 0.05; // per key press, normalized units
const SEND_PERIOD_MS: u64 = 20;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SERIAL_PORT.to_string());

    info!("Opening {} at {} baud", port_name, SERIAL_BAUDRATE);
    let mut port = serialport::new(&port_name, SERIAL_BAUDRATE)
        .timeout(Duration::from_millis(100))
        .open()?;

    info!("Controls: A/D=roll, W/S=pitch, R/F=height, Space=center, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&mut port);
    disable_raw_mode()?;

    result
}

fn run_teleop(
    port: &mut Box<dyn serialport::SerialPort>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut pose = [0.0f32; 3]; // roll, pitch, height

    loop {
        // Poll doubles as the send period
        if event::poll(Duration::from_millis(SEND_PERIOD_MS))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('a') if pressed => pose[0] -= STEP,
                    KeyCode::Char('d') if pressed => pose[0] += STEP,
                    KeyCode::Char('w') if pressed => pose[1] += STEP,
                    KeyCode::Char('s') if pressed => pose[1] -= STEP,
                    KeyCode::Char('r') if pressed => pose[2] += STEP,
                    KeyCode::Char('f') if pressed => pose[2] -= STEP,
                    KeyCode::Char(' ') if pressed => pose = [0.0; 3],

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
                pose = pose.map(|v| v.clamp(-1.0, 1.0));
            }
        }

        let frame = format!("{:.3},{:.3},{:.3}\n", pose[0], pose[1], pose[2]);
        port.write_all(frame.as_bytes())?;
    }

    Ok(())
}
