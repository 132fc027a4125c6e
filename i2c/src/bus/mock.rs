use crate::bus::I2cBus;
use crate::{LcdError, LcdResult};

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum BusEvent {
    Write(u8),
    Settle,
    Label(String),
}

/// Records everything sent to it. Optionally refuses the write at `fail_at` (0-based) and every
/// write after it, as a bus that stopped acknowledging would.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
    pub events: Vec<BusEvent>,
    pub fail_at: Option<usize>,
    pub attempts: usize,
}

impl MockBus {
    pub fn failing_at(index: usize) -> Self {
        MockBus {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub fn writes(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Write(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn settles(&self) -> usize {
        self.events
            .iter()
            .filter(|event| **event == BusEvent::Settle)
            .count()
    }
}

impl I2cBus for MockBus {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at.is_some_and(|index| attempt >= index) {
            return Err(LcdError::BusWrite(
                "short write, 0 of 1 bytes accepted".to_string(),
            ));
        }
        self.events.push(BusEvent::Write(byte));
        Ok(())
    }

    fn settle(&mut self) {
        self.events.push(BusEvent::Settle);
    }

    fn label(&mut self, label: &str) -> LcdResult<()> {
        self.events.push(BusEvent::Label(label.to_string()));
        Ok(())
    }
}
