//! LED command set and its wire encoding.
//!
//! Pure, like the rest of `domain/`: a command value goes in, the exact
//! byte for the microcontroller and the human-facing strings come out.

use super::LedError;

/// Logical actions understood by the LED firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::TurnOn, Command::TurnOff];

    /// Single byte written to the serial port (ASCII '1' / '2').
    pub fn wire_byte(self) -> u8 {
        match self {
            Command::TurnOn => b'1',
            Command::TurnOff => b'2',
        }
    }

    /// Action label persisted in the audit log.
    pub fn label(self) -> &'static str {
        match self {
            Command::TurnOn => "Ligar LED",
            Command::TurnOff => "Desligar LED",
        }
    }

    /// Verb used inside error sentences ("ao ligar LED").
    fn verb(self) -> &'static str {
        match self {
            Command::TurnOn => "ligar",
            Command::TurnOff => "desligar",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Command::TurnOn => "LED Ligado com sucesso!",
            Command::TurnOff => "LED Desligado com sucesso!",
        }
    }

    pub fn failure_message(self, err: &LedError) -> String {
        match err {
            LedError::Io(_) => format!("Erro de I/O ao {} LED: {err}", self.verb()),
            _ => format!("Erro ao {} LED: {err}", self.verb()),
        }
    }

    /// Audit detail for a byte that reached the port.
    pub fn success_detail(self) -> String {
        let byte = self.wire_byte();
        format!(
            "Comando '{}' (0x{byte:02X}) enviado para o Arduino: {}.",
            byte as char,
            self.label()
        )
    }

    /// Audit detail for a failed send; carries the taxonomy name.
    pub fn failure_detail(self, err: &LedError) -> String {
        format!(
            "{}: falha ao enviar comando '{}': {err}",
            err.kind(),
            self.wire_byte() as char
        )
    }
}
