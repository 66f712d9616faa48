//! Integration tests: concurrent callers share one Channel
//!
//! `OverlapDetector` is a serial double that notices when two writes are
//! in flight at once. It sleeps inside every write to widen the window.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use ledlink_lib::adapters::memory_audit::MemoryAuditLog;
use ledlink_lib::channel::Channel;
use ledlink_lib::dispatcher::Dispatcher;
use ledlink_lib::domain::{AuditStatus, Command, LedResult, SerialPortInfo};
use ledlink_lib::ports::{SerialConnection, SerialFactory};

#[derive(Default)]
struct Probe {
    in_flight: AtomicBool,
    overlaps: AtomicUsize,
    written: Mutex<Vec<u8>>,
}

struct OverlapDetector {
    probe: Arc<Probe>,
}

impl SerialConnection for OverlapDetector {
    fn write_byte(&mut self, byte: u8) -> LedResult<()> {
        if self.probe.in_flight.swap(true, Ordering::SeqCst) {
            self.probe.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        thread::sleep(Duration::from_millis(2));
        self.probe.written.lock().unwrap().push(byte);
        self.probe.in_flight.store(false, Ordering::SeqCst);
        Ok(())
    }
    fn close(&mut self) -> LedResult<()> {
        // A close racing a write would trip the detector too.
        if self.probe.in_flight.load(Ordering::SeqCst) {
            self.probe.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
    fn is_connected(&self) -> bool {
        true
    }
}

struct DetectorFactory {
    port: &'static str,
    probe: Arc<Probe>,
}

impl SerialFactory for DetectorFactory {
    fn list_ports(&self) -> LedResult<Vec<SerialPortInfo>> {
        Ok(vec![SerialPortInfo {
            name: self.port.to_string(),
            port_type: "Probe".into(),
        }])
    }
    fn open(&self, _port: &str, _baud: u32, _timeout: Duration) -> LedResult<Box<dyn SerialConnection>> {
        Ok(Box::new(OverlapDetector {
            probe: Arc::clone(&self.probe),
        }))
    }
}

const THREADS: usize = 8;
const PER_THREAD: usize = 10;

#[test]
fn concurrent_sends_never_interleave() {
    let probe = Arc::new(Probe::default());
    let factory = DetectorFactory {
        port: "concurrent-send",
        probe: Arc::clone(&probe),
    };
    let channel = Arc::new(Channel::open(&factory, "concurrent-send", 9600, Duration::from_millis(50)).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let channel = Arc::clone(&channel);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let byte = if i % 2 == 0 { b'1' } else { b'2' };
                for _ in 0..PER_THREAD {
                    channel.send(byte).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(probe.overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(probe.written.lock().unwrap().len(), THREADS * PER_THREAD);
}

#[test]
fn concurrent_dispatch_audits_every_attempt() {
    let probe = Arc::new(Probe::default());
    let factory = DetectorFactory {
        port: "concurrent-dispatch",
        probe: Arc::clone(&probe),
    };
    let channel = Channel::open(&factory, "concurrent-dispatch", 9600, Duration::from_millis(50)).unwrap();
    let audit = Arc::new(MemoryAuditLog::new());
    let dispatcher = Dispatcher::new(Arc::new(channel), audit.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                let command = Command::ALL[i % 2];
                for _ in 0..PER_THREAD {
                    dispatcher.dispatch(command);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let records = audit.records();
    assert_eq!(records.len(), THREADS * PER_THREAD);
    assert!(records.iter().all(|r| r.record.status() == AuditStatus::Success));

    // Ids are distinct: no record was overwritten.
    let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(probe.overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn close_during_sends_leaves_channel_consistent() {
    let probe = Arc::new(Probe::default());
    let factory = DetectorFactory {
        port: "concurrent-close",
        probe: Arc::clone(&probe),
    };
    let channel = Arc::new(Channel::open(&factory, "concurrent-close", 9600, Duration::from_millis(50)).unwrap());

    let senders: Vec<_> = (0..4)
        .map(|_| {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                // Each send either lands or reports NotOpen; neither panics.
                (0..PER_THREAD).filter(|_| channel.send(b'1').is_ok()).count()
            })
        })
        .collect();
    thread::sleep(Duration::from_millis(5));
    channel.close();

    let delivered: usize = senders.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(delivered, probe.written.lock().unwrap().len());
    assert_eq!(probe.overlaps.load(Ordering::SeqCst), 0);
    assert!(channel.send(b'2').is_err());
}
