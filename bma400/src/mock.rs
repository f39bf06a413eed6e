//! Fault-injecting transport and clock for driver tests.
//!
//! Both share one event log so tests can check the interleaving of register
//! writes and delays.

extern crate std;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::interface::Bma400Interface;
use crate::registers::Reg;
use crate::types::RawSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Write { reg: u8, value: u8 },
    Read { reg: u8, len: usize },
    DelayMs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Default)]
struct State {
    events: Vec<Event>,
    registers: Vec<u8>,
    samples: VecDeque<[u8; 6]>,
    last_sample: [u8; 6],
    writes: usize,
    sample_reads: usize,
    fail_write_at: Option<usize>,
    fail_sample_read_at: Option<usize>,
    elapsed_us: u64,
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<State>>);

impl EventLog {
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().events.clone()
    }

    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut self.0.lock().unwrap().events)
    }
}

pub struct FakeBus {
    state: Arc<Mutex<State>>,
}

impl FakeBus {
    pub fn new() -> Self {
        let state = State {
            registers: std::vec![0u8; 0x80],
            ..Default::default()
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    pub fn log(&self) -> EventLog {
        EventLog(self.state.clone())
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock { state: self.state.clone() }
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.lock().unwrap().registers[reg as usize] = value;
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.lock().unwrap().registers[reg as usize]
    }

    /// Queues one accelerometer burst. Once the queue is empty the last
    /// sample keeps being returned.
    pub fn push_sample(&self, raw: [u8; 6]) {
        self.state.lock().unwrap().samples.push_back(raw);
    }

    /// Fails the `n`th register write (1-based).
    pub fn fail_write(&self, n: usize) {
        self.state.lock().unwrap().fail_write_at = Some(n);
    }

    /// Fails the `n`th accelerometer burst read (1-based).
    pub fn fail_sample_read(&self, n: usize) {
        self.state.lock().unwrap().fail_sample_read_at = Some(n);
    }

    pub fn write_count(&self, reg: u8, value: u8) -> usize {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| **e == Event::Write { reg, value })
            .count()
    }
}

impl Bma400Interface for FakeBus {
    type Error = BusFault;

    fn write_register(&mut self, _addr: u8, reg: u8, data: u8) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if state.fail_write_at == Some(state.writes) {
            return Err(BusFault);
        }
        state.registers[reg as usize] = data;
        state.events.push(Event::Write { reg, value: data });
        Ok(())
    }

    fn read_register(&mut self, _addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Read { reg, len: 1 });
        Ok(state.registers[reg as usize])
    }

    fn read_registers(&mut self, _addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        if reg == Reg::AccXLsb as u8 && buf.len() == 6 {
            state.sample_reads += 1;
            if state.fail_sample_read_at == Some(state.sample_reads) {
                return Err(BusFault);
            }
            if let Some(next) = state.samples.pop_front() {
                state.last_sample = next;
            }
            buf.copy_from_slice(&state.last_sample);
        } else {
            let start = reg as usize;
            buf.copy_from_slice(&state.registers[start..start + buf.len()]);
        }
        state.events.push(Event::Read { reg, len: buf.len() });
        Ok(())
    }
}

pub struct FakeClock {
    state: Arc<Mutex<State>>,
}

impl FakeClock {
    pub fn elapsed_us(&self) -> u64 {
        self.state.lock().unwrap().elapsed_us
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.state.lock().unwrap().elapsed_us += u64::from(ns) / 1000;
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut state = self.state.lock().unwrap();
        state.elapsed_us += u64::from(ms) * 1000;
        state.events.push(Event::DelayMs(ms));
    }
}

pub fn encode_sample(sample: RawSample) -> [u8; 6] {
    let mut raw = [0u8; 6];
    for (i, value) in [sample.x, sample.y, sample.z].into_iter().enumerate() {
        let bits = (value as u16) & 0x0FFF;
        raw[2 * i] = (bits & 0xFF) as u8;
        raw[2 * i + 1] = (bits >> 8) as u8;
    }
    raw
}
