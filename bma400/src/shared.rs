//! Driver handle that can be shared between interrupt handlers and the main
//! loop. Every access runs inside a critical section, so transfers from
//! different contexts never interleave on the bus.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::Bma400;

pub struct SharedBma400<IFACE, D> {
    inner: Mutex<RefCell<Bma400<IFACE, D>>>,
}

impl<IFACE, D> SharedBma400<IFACE, D> {
    pub const fn new(dev: Bma400<IFACE, D>) -> Self {
        Self { inner: Mutex::new(RefCell::new(dev)) }
    }

    /// Runs `f` with exclusive access to the driver.
    ///
    /// Calling `lock` again from inside `f` panics.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Bma400<IFACE, D>) -> R) -> R {
        critical_section::with(|cs| {
            let mut dev = self.inner.borrow_ref_mut(cs);
            f(&mut dev)
        })
    }

    pub fn into_inner(self) -> Bma400<IFACE, D> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mock::{encode_sample, Event, FakeBus, FakeClock};
    use crate::types::{ConfigurationProfile, DeviceState, InterruptPins, RawSample};
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    fn shared(bus: FakeBus) -> SharedBma400<FakeBus, FakeClock> {
        let clock = bus.clock();
        SharedBma400::new(Bma400::default(bus, clock, InterruptPins::default()))
    }

    #[test]
    fn lock_gives_access_to_driver() {
        let bus = FakeBus::new();
        bus.push_sample(encode_sample(RawSample { x: 3, y: -4, z: 5 }));
        let dev = shared(bus);

        dev.lock(|d| d.configure(ConfigurationProfile::default())).unwrap();
        let raw = dev.lock(|d| d.read_accel_raw()).unwrap();

        assert_eq!(raw, RawSample { x: 3, y: -4, z: 5 });
        let dev = dev.into_inner();
        assert_eq!(dev.state(), DeviceState::Configured(ConfigurationProfile::default()));
    }

    #[test]
    fn concurrent_users_do_not_interleave_transfers() {
        let bus = FakeBus::new();
        let log = bus.log();
        let dev = Arc::new(shared(bus));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dev = Arc::clone(&dev);
                thread::spawn(move || {
                    for _ in 0..10 {
                        dev.lock(|d| {
                            d.disable_no_motion_interrupt()?;
                            d.enable_no_motion_interrupt()
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = log.events();
        assert_eq!(events.len(), 80);
        for pair in events.chunks(2) {
            assert_eq!(pair[0], Event::Write { reg: 0x1F, value: 0x00 });
            assert_eq!(pair[1], Event::Write { reg: 0x1F, value: 0x04 });
        }
    }
}
