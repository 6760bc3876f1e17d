use super::*;
use crate::wrapper::{
    CommandBlockWrapper, CommandStatusWrapper, CswStatus, CSW_LEN,
};
use bot_scsi::commands::{
    INQUIRY, INQUIRY_LEN, READ_CAPACITY_10, READ_CAPACITY_10_LEN,
    REQUEST_SENSE, SENSE_LEN,
};
use bot_usb_host::mocks::{MockUsbHost, MockUsbHostInner};
use bot_usb_host::types::{EndpointInfo, InterfaceInfo};
use bot_usb_host::wire::{parse_descriptors, CLEAR_FEATURE};
use futures::{future, Future};
use std::cell::RefCell;
use std::fmt::Debug;
use std::pin::{pin, Pin};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::task::{Poll, Wake, Waker};

// Test harness shared by all the mass_storage tests

pub struct NoOpWaker;

impl Wake for NoOpWaker {
    fn wake(self: Arc<Self>) {}
}

pub type MockError = Error;
pub type PinnedFuture = Pin<Box<dyn Future<Output = Result<usize, UsbError>>>>;
pub type PinnedUnitFuture = Pin<Box<dyn Future<Output = Result<(), UsbError>>>>;
pub type DelayFn = fn(usize) -> future::Ready<()>;

pub const BULK_IN: EndpointHandle = EndpointHandle(0x81);
pub const BULK_OUT: EndpointHandle = EndpointHandle(0x02);

thread_local! {
    static DELAYS: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}

/// A delay that doesn't, but remembers that it was asked for
pub fn recording_delay(ms: usize) -> future::Ready<()> {
    DELAYS.with(|d| d.borrow_mut().push(ms));
    future::ready(())
}

/// All the delays asked for so far on this thread (i.e., in this test)
pub fn delays() -> Vec<usize> {
    DELAYS.with(|d| d.borrow().clone())
}

/// The tag of the last CBW the mock device received
///
/// The mock CSWs echo it back, as a real device would.
#[derive(Clone, Default)]
pub struct LastTag(Arc<AtomicU32>);

impl LastTag {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn cbw_ok(
        &self,
    ) -> impl FnMut(EndpointHandle, &[u8], u32) -> PinnedFuture {
        let tag = self.clone();
        move |_, d, _| {
            if let Some(cbw) = CommandBlockWrapper::from_bytes(d) {
                tag.0.store(cbw.tag, Ordering::SeqCst);
            }
            Box::pin(future::ready(Ok(d.len())))
        }
    }

    pub fn csw(
        &self,
        status: u8,
        residue: u32,
    ) -> impl FnMut(EndpointHandle, &mut [u8], u32) -> PinnedFuture {
        let tag = self.clone();
        move |_, d, _| {
            let csw = CommandStatusWrapper::new(
                tag.get(),
                residue,
                CswStatus::from(status),
            );
            d[..CSW_LEN].copy_from_slice(&csw.to_bytes());
            Box::pin(future::ready(Ok(CSW_LEN)))
        }
    }
}

/// The SCSI opcode inside a CBW, if `d` is one
pub fn cbw_op(d: &[u8]) -> Option<u8> {
    CommandBlockWrapper::from_bytes(d).map(|cbw| cbw.cdb()[0])
}

pub fn bulk_out_ok(_: EndpointHandle, d: &[u8], _: u32) -> PinnedFuture {
    Box::pin(future::ready(Ok(d.len())))
}

pub fn bulk_out_fails_with(
    e: UsbError,
) -> impl FnMut(EndpointHandle, &[u8], u32) -> PinnedFuture {
    move |_, _, _| Box::pin(future::ready(Err(e)))
}

pub fn bulk_in_ok_with<F: FnMut(&mut [u8]) -> usize>(
    mut f: F,
) -> impl FnMut(EndpointHandle, &mut [u8], u32) -> PinnedFuture {
    move |_, d, _| {
        let n = f(d);
        Box::pin(future::ready(Ok(n)))
    }
}

pub fn bulk_in_fails_with(
    e: UsbError,
) -> impl FnMut(EndpointHandle, &mut [u8], u32) -> PinnedFuture {
    move |_, _, _| Box::pin(future::ready(Err(e)))
}

pub fn bulk_in_pends(_: EndpointHandle, _: &mut [u8], _: u32) -> PinnedFuture {
    Box::pin(future::pending())
}

/// Reply with these bytes (or as many as fit)
pub fn reply(bytes: Vec<u8>) -> impl FnMut(&mut [u8]) -> usize {
    move |d| {
        let n = bytes.len().min(d.len());
        d[..n].copy_from_slice(&bytes[..n]);
        n
    }
}

pub fn control_transfer_ok(
    _: DeviceHandle,
    _: SetupPacket,
    _: DataPhase,
    _: u32,
) -> PinnedFuture {
    Box::pin(future::ready(Ok(0)))
}

pub fn control_transfer_fails(
    _: DeviceHandle,
    _: SetupPacket,
    _: DataPhase,
    _: u32,
) -> PinnedFuture {
    Box::pin(future::ready(Err(UsbError::Stall)))
}

#[rustfmt::skip]
pub fn control_transfer_ok_with<F: FnMut(&mut [u8]) -> usize>(
    mut f: F,
) -> impl FnMut(
    DeviceHandle,
    SetupPacket,
    DataPhase,
    u32,
) -> PinnedFuture {
    move |_, _, mut d, _| {
        let mut n = 0;
        d.in_with(|bytes| n = f(bytes));
        Box::pin(future::ready(Ok(n)))
    }
}

pub fn halt_ok(_: EndpointHandle, _: u8) -> PinnedUnitFuture {
    Box::pin(future::ready(Ok(())))
}

pub fn halt_fails(_: EndpointHandle, _: u8) -> PinnedUnitFuture {
    Box::pin(future::ready(Err(UsbError::Timeout)))
}

pub fn sense_reply(key: u8, asc: u8, ascq: u8) -> Vec<u8> {
    let mut v = vec![0u8; SENSE_LEN];
    v[0] = 0x70;
    v[2] = key;
    v[7] = 10;
    v[12] = asc;
    v[13] = ascq;
    v
}

pub fn inquiry_reply() -> Vec<u8> {
    let mut v = vec![0u8; INQUIRY_LEN];
    v[1] = 0x80;
    v[2] = 4;
    v[4] = 31;
    v[8..16].copy_from_slice(b"Generic ");
    v[16..32].copy_from_slice(b"Flash Disk      ");
    v[32..36].copy_from_slice(b"8.07");
    v
}

pub fn capacity_reply(lba_count: u32, lba_size: u32) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&lba_count.to_be_bytes());
    v.extend_from_slice(&lba_size.to_be_bytes());
    v
}

pub trait ExtraExpectations {
    /// Expect a CBW carrying this SCSI opcode
    fn expect_cbw(&mut self, tag: &LastTag, op: u8);

    /// Expect a data-phase IN transfer of `len` bytes, answered with
    /// `bytes`
    fn expect_data_in(&mut self, len: usize, bytes: Vec<u8>);

    /// Expect a data-phase OUT transfer of `len` bytes
    fn expect_data_out(&mut self, len: usize);

    /// Expect a CSW read, answered with this status
    fn expect_csw(&mut self, tag: &LastTag, status: u8);

    /// Expect a whole REQUEST SENSE, answered with this sense data
    fn expect_sense(&mut self, tag: &LastTag, key: u8, asc: u8, ascq: u8);

    /// Expect the host and device halts on an endpoint to be cleared
    fn expect_clear_halt(&mut self, ep: EndpointHandle);

    /// Expect a Mass Storage Reset and both bulk halts cleared
    fn expect_reset_recovery(&mut self);
}

impl ExtraExpectations for MockUsbHostInner {
    fn expect_cbw(&mut self, tag: &LastTag, op: u8) {
        self.expect_bulk_out_transfer()
            .times(1)
            .withf(move |ep, d, _| *ep == BULK_OUT && cbw_op(d) == Some(op))
            .returning(tag.cbw_ok());
    }

    fn expect_data_in(&mut self, len: usize, bytes: Vec<u8>) {
        self.expect_bulk_in_transfer()
            .times(1)
            .withf(move |ep, d, _| *ep == BULK_IN && d.len() == len)
            .returning(bulk_in_ok_with(reply(bytes)));
    }

    fn expect_data_out(&mut self, len: usize) {
        self.expect_bulk_out_transfer()
            .times(1)
            .withf(move |ep, d, _| {
                *ep == BULK_OUT && d.len() == len && cbw_op(d).is_none()
            })
            .returning(bulk_out_ok);
    }

    fn expect_csw(&mut self, tag: &LastTag, status: u8) {
        self.expect_bulk_in_transfer()
            .times(1)
            .withf(|ep, d, _| *ep == BULK_IN && d.len() == CSW_LEN)
            .returning(tag.csw(status, 0));
    }

    fn expect_sense(&mut self, tag: &LastTag, key: u8, asc: u8, ascq: u8) {
        self.expect_cbw(tag, REQUEST_SENSE);
        self.expect_data_in(SENSE_LEN, sense_reply(key, asc, ascq));
        self.expect_csw(tag, 0);
    }

    fn expect_clear_halt(&mut self, ep: EndpointHandle) {
        self.expect_clear_host_halt()
            .times(1)
            .withf(move |e| *e == ep)
            .returning(|_| Ok(()));
        self.expect_endpoint_halt()
            .times(1)
            .withf(move |e, r| *e == ep && *r == CLEAR_FEATURE)
            .returning(halt_ok);
    }

    fn expect_reset_recovery(&mut self) {
        self.expect_control_transfer()
            .times(1)
            .withf(|_, s, _, _| {
                s.bmRequestType == 0x21
                    && s.bRequest == MASS_STORAGE_RESET
                    && s.wLength == 0
            })
            .returning(control_transfer_ok);
        self.expect_clear_halt(BULK_IN);
        self.expect_clear_halt(BULK_OUT);
    }
}

trait PollExtras<T> {
    fn to_option(self) -> Option<T>;
}

impl<T> PollExtras<T> for Poll<T> {
    fn to_option(self) -> Option<T> {
        match self {
            Poll::Ready(t) => Some(t),
            _ => None,
        }
    }
}

pub struct Fixture<'a> {
    pub c: &'a mut core::task::Context<'a>,
    pub m: MassStorage<'a, MockUsbHost, DelayFn>,
}

/// Run a test against a session that's already been initialised, with
/// 1000 blocks of 512 bytes
pub fn do_test<
    SetupFn: FnMut(&mut MockUsbHostInner, &LastTag),
    TestFn: FnMut(Fixture),
>(
    setup: SetupFn,
    test: TestFn,
) {
    do_test_with(Config::default(), 512, setup, test);
}

pub fn do_test_with<
    SetupFn: FnMut(&mut MockUsbHostInner, &LastTag),
    TestFn: FnMut(Fixture),
>(
    config: Config,
    lba_size: u32,
    mut setup: SetupFn,
    mut test: TestFn,
) {
    let w = Waker::from(Arc::new(NoOpWaker));
    let mut c = core::task::Context::from_waker(&w);

    let mut host = MockUsbHost::default();
    let tag = LastTag::default();
    DELAYS.with(|d| d.borrow_mut().clear());

    setup(&mut host.inner, &tag);

    let f = Fixture {
        c: &mut c,
        m: MassStorage::new_for_test(
            &host,
            1000,
            lba_size,
            config,
            recording_delay as DelayFn,
        ),
    };

    test(f);
}

pub trait ContextExtras {
    fn check_ok<T, F: Future<Output = Result<T, MockError>>>(
        &mut self,
        fut: F,
    ) -> T;

    fn check_fails_custom<
        T: Debug + PartialEq,
        F: Future<Output = Result<T, MockError>>,
    >(
        &mut self,
        fut: F,
        e: MockError,
    );

    fn check_pends<T, F: Future<Output = Result<T, MockError>>>(
        &mut self,
        fut: F,
    );
}

impl ContextExtras for core::task::Context<'_> {
    fn check_ok<T, F: Future<Output = Result<T, MockError>>>(
        &mut self,
        fut: F,
    ) -> T {
        let fut = pin!(fut);
        let result = fut.poll(self).to_option().unwrap();
        result.unwrap()
    }

    fn check_fails_custom<
        T: Debug + PartialEq,
        F: Future<Output = Result<T, MockError>>,
    >(
        &mut self,
        fut: F,
        e: MockError,
    ) {
        let fut = pin!(fut);
        let result = fut.poll(self).to_option().unwrap();
        assert_eq!(result.unwrap_err(), e);
    }

    fn check_pends<T, F: Future<Output = Result<T, MockError>>>(
        &mut self,
        fut: F,
    ) {
        let mut fut = pin!(fut);
        let result = fut.as_mut().poll(self);
        assert!(result.is_pending());
        let result2 = fut.as_mut().poll(self);
        assert!(result2.is_pending());
    }
}

// init()

fn bulk_endpoint(index: u8) -> Result<EndpointInfo, UsbError> {
    match index {
        0 => Ok(EndpointInfo {
            handle: BULK_IN,
            number: 1,
            direction: Direction::In,
            endpoint_type: EndpointType::Bulk,
            max_packet_size: 512,
        }),
        1 => Ok(EndpointInfo {
            handle: BULK_OUT,
            number: 2,
            direction: Direction::Out,
            endpoint_type: EndpointType::Bulk,
            max_packet_size: 512,
        }),
        _ => Err(UsbError::NoSuchEndpoint),
    }
}

fn expect_interface(hc: &mut MockUsbHostInner) {
    hc.expect_interface_info()
        .withf(|i| *i == InterfaceHandle(7))
        .returning(|_| {
            Ok(InterfaceInfo {
                device: DeviceHandle(1),
                interface_number: 3,
            })
        });
}

fn expect_max_lun(hc: &mut MockUsbHostInner, max_lun: u8) {
    hc.expect_control_transfer()
        .times(1)
        .withf(|d, s, data, _| {
            *d == DeviceHandle(1)
                && s.bmRequestType == 0xA1
                && s.bRequest == GET_MAX_LUN
                && s.wValue == 0
                && s.wIndex == 3
                && s.wLength == 1
                && data.len() == 1
        })
        .returning(control_transfer_ok_with(move |b| {
            b[0] = max_lun;
            1
        }));
}

fn do_init_test<
    SetupFn: FnMut(&mut MockUsbHostInner, &LastTag),
    TestFn: FnOnce(Result<MassStorage<'_, MockUsbHost, DelayFn>, Error>),
>(
    lun: u8,
    mut setup: SetupFn,
    test: TestFn,
) {
    let w = Waker::from(Arc::new(NoOpWaker));
    let mut c = core::task::Context::from_waker(&w);

    let mut host = MockUsbHost::default();
    let tag = LastTag::default();
    DELAYS.with(|d| d.borrow_mut().clear());
    setup(&mut host.inner, &tag);

    let fut = pin!(MassStorage::init(
        &host,
        InterfaceHandle(7),
        lun,
        Config::default(),
        recording_delay as DelayFn,
    ));
    let result = fut.poll(&mut c).to_option().unwrap();
    test(result);
}

#[test]
fn init() {
    do_init_test(
        0,
        |hc, tag| {
            expect_interface(hc);
            hc.expect_endpoint_info()
                .withf(|i, _| *i == InterfaceHandle(7))
                .returning(|_, n| bulk_endpoint(n));
            expect_max_lun(hc, 0);
            hc.expect_cbw(tag, INQUIRY);
            hc.expect_data_in(INQUIRY_LEN, inquiry_reply());
            hc.expect_csw(tag, 0);
            hc.expect_cbw(tag, READ_CAPACITY_10);
            hc.expect_data_in(READ_CAPACITY_10_LEN, capacity_reply(1000, 512));
            hc.expect_csw(tag, 0);
        },
        |result| {
            let ms = result.unwrap();
            assert_eq!(ms.lba_count(), 1000);
            assert_eq!(ms.lba_size(), 512);
            assert_eq!(ms.capacity_bytes(), 512_000);
            assert_eq!(ms.lun(), 0);
            assert_eq!(ms.max_lun(), 0);
            assert_eq!(ms.interface_number(), 3);
            assert_eq!(ms.vendor_id(), b"Generic ");
            assert_eq!(ms.product_id(), b"Flash Disk      ");
            assert_eq!(ms.revision(), b"8.07");
            assert_eq!(ms.tag(), 2);
            assert_eq!(ms.phase(), Phase::Idle);
            assert_eq!(delays(), vec![100, 50]);
        },
    );
}

#[test]
fn init_second_lun() {
    do_init_test(
        1,
        |hc, tag| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| bulk_endpoint(n));
            expect_max_lun(hc, 1);
            hc.expect_bulk_out_transfer()
                .times(1)
                .withf(|_, d, _| {
                    d.len() == 31 && d[13] == 1 && d[15] == INQUIRY
                })
                .returning(tag.cbw_ok());
            hc.expect_data_in(INQUIRY_LEN, inquiry_reply());
            hc.expect_csw(tag, 0);
            hc.expect_cbw(tag, READ_CAPACITY_10);
            hc.expect_data_in(READ_CAPACITY_10_LEN, capacity_reply(99, 2048));
            hc.expect_csw(tag, 0);
        },
        |result| {
            let ms = result.unwrap();
            assert_eq!(ms.lun(), 1);
            assert_eq!(ms.max_lun(), 1);
            assert_eq!(ms.lba_count(), 99);
            assert_eq!(ms.lba_size(), 2048);
        },
    );
}

#[test]
fn init_skips_interrupt_endpoint() {
    do_init_test(
        0,
        |hc, tag| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| match n {
                0 => Ok(EndpointInfo {
                    handle: EndpointHandle(0x83),
                    number: 3,
                    direction: Direction::In,
                    endpoint_type: EndpointType::Interrupt,
                    max_packet_size: 8,
                }),
                n => bulk_endpoint(n - 1),
            });
            expect_max_lun(hc, 0);
            hc.expect_cbw(tag, INQUIRY);
            hc.expect_data_in(INQUIRY_LEN, inquiry_reply());
            hc.expect_csw(tag, 0);
            hc.expect_cbw(tag, READ_CAPACITY_10);
            hc.expect_data_in(READ_CAPACITY_10_LEN, capacity_reply(1000, 512));
            hc.expect_csw(tag, 0);
        },
        |result| {
            assert!(result.is_ok());
        },
    );
}

#[test]
fn init_no_bulk_out() {
    do_init_test(
        0,
        |hc, _| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| match n {
                0 => bulk_endpoint(0),
                _ => Err(UsbError::NoSuchEndpoint),
            });
            hc.expect_control_transfer().times(0);
            hc.expect_bulk_out_transfer().times(0);
        },
        |result| {
            assert_eq!(result.err(), Some(Error::ClassNotSupported));
            assert_eq!(delays(), vec![100]);
        },
    );
}

#[test]
fn init_endpoint_info_fails() {
    do_init_test(
        0,
        |hc, _| {
            expect_interface(hc);
            hc.expect_endpoint_info()
                .returning(|_, _| Err(UsbError::NoDevice));
        },
        |result| {
            assert_eq!(
                result.err(),
                Some(Error::Transport(UsbError::NoDevice))
            );
        },
    );
}

#[test]
fn init_max_lun_stalls() {
    do_init_test(
        0,
        |hc, _| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| bulk_endpoint(n));
            hc.expect_control_transfer()
                .times(1)
                .returning(control_transfer_fails);
            hc.expect_bulk_out_transfer().times(0);
        },
        |result| {
            assert_eq!(result.err(), Some(Error::ClassNotSupported));
        },
    );
}

#[test]
fn init_max_lun_silly() {
    do_init_test(
        0,
        |hc, _| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| bulk_endpoint(n));
            expect_max_lun(hc, 200);
        },
        |result| {
            assert_eq!(result.err(), Some(Error::ClassNotSupported));
        },
    );
}

#[test]
fn init_lun_too_big() {
    do_init_test(
        2,
        |hc, _| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| bulk_endpoint(n));
            expect_max_lun(hc, 1);
            hc.expect_bulk_out_transfer().times(0);
        },
        |result| {
            assert_eq!(result.err(), Some(Error::Parameter));
        },
    );
}

#[test]
fn init_capacity_fails() {
    do_init_test(
        0,
        |hc, tag| {
            expect_interface(hc);
            hc.expect_endpoint_info().returning(|_, n| bulk_endpoint(n));
            expect_max_lun(hc, 0);
            hc.expect_cbw(tag, INQUIRY);
            hc.expect_data_in(INQUIRY_LEN, inquiry_reply());
            hc.expect_csw(tag, 0);
            for _ in 0..20 {
                hc.expect_cbw(tag, READ_CAPACITY_10);
                hc.expect_data_in(READ_CAPACITY_10_LEN, Vec::new());
                hc.expect_csw(tag, 1);
                hc.expect_sense(tag, 2, 0x3A, 0);
            }
        },
        |result| {
            assert_eq!(result.err(), Some(Error::RetriesExhausted));
            let mut expected = vec![100, 50];
            expected.extend([50; 19]);
            assert_eq!(delays(), expected);
        },
    );
}

// Get Max LUN and reset

#[test]
fn get_max_lun() {
    do_test(
        |hc, _| {
            hc.expect_control_transfer()
                .times(1)
                .withf(|_, s, _, timeout| {
                    s.bmRequestType == 0xA1
                        && s.bRequest == 0xFE
                        && s.wIndex == 0
                        && s.wLength == 1
                        && *timeout == 500
                })
                .returning(control_transfer_ok_with(|b| {
                    b[0] = 3;
                    1
                }));
        },
        |mut f| {
            let n = f.c.check_ok(f.m.get_max_lun());
            assert_eq!(n, 3);
        },
    );
}

#[test]
fn get_max_lun_no_data() {
    do_test(
        |hc, _| {
            hc.expect_control_transfer()
                .times(1)
                .returning(control_transfer_ok);
        },
        |mut f| {
            f.c.check_fails_custom(f.m.get_max_lun(), Error::ProtocolError);
        },
    );
}

#[test]
fn reset() {
    do_test(
        |hc, _| {
            hc.expect_control_transfer()
                .times(1)
                .withf(|d, s, data, _| {
                    *d == DeviceHandle(1)
                        && s.bmRequestType == 0x21
                        && s.bRequest == 0xFF
                        && s.wValue == 0
                        && s.wIndex == 0
                        && s.wLength == 0
                        && data.is_empty()
                })
                .returning(control_transfer_ok);
        },
        |mut f| {
            f.c.check_ok(f.m.reset());
            assert_eq!(f.m.phase(), Phase::Idle);
        },
    );
}

#[test]
fn reset_fails() {
    do_test(
        |hc, _| {
            hc.expect_control_transfer()
                .times(1)
                .returning(control_transfer_fails);
        },
        |mut f| {
            f.c.check_fails_custom(
                f.m.reset(),
                Error::Transport(UsbError::Stall),
            );
        },
    );
}

#[test]
fn accessors() {
    do_test(
        |_, _| {},
        |f| {
            assert_eq!(f.m.lba_count(), 1000);
            assert_eq!(f.m.lba_size(), 512);
            assert_eq!(f.m.capacity_bytes(), 512_000);
            assert_eq!(f.m.tag(), 0);
            assert_eq!(f.m.phase(), Phase::Idle);
            assert!(f.m.config().check_csw_tag);
        },
    );
}

// IdentifyMassStorage

const STICK: &[u8] = &[
    9, 2, 32, 0, 1, 1, 0, 128, 50, // configuration
    9, 4, 0, 0, 2, 8, 6, 80, 0, // interface
    7, 5, 0x81, 2, 0, 2, 0, // endpoint IN
    7, 5, 2, 2, 0, 2, 0, // endpoint OUT
];

const HID_THEN_MSC: &[u8] = &[
    9, 2, 57, 0, 2, 2, 0, 128, 50, // configuration
    9, 4, 0, 0, 1, 3, 0, 0, 0, // interface: HID
    7, 5, 0x83, 3, 8, 0, 10, // endpoint interrupt IN
    9, 4, 1, 0, 2, 8, 6, 80, 0, // interface: MSC
    7, 5, 0x81, 2, 0, 2, 0, // endpoint IN
    7, 5, 2, 2, 0, 2, 0, // endpoint OUT
    9, 4, 2, 0, 2, 8, 6, 80, 0, // interface: another MSC
];

const UAS_ONLY: &[u8] = &[
    9, 2, 18, 0, 1, 1, 0, 128, 50, // configuration
    9, 4, 0, 0, 4, 8, 6, 0x62, 0, // interface: UAS
];

#[test]
fn identify_stick() {
    let mut d = IdentifyMassStorage::default();
    parse_descriptors(STICK, &mut d);
    assert_eq!(d.identify(), Some(1));
    assert_eq!(d.interface(), Some(0));
}

#[test]
fn identify_first_of_several() {
    let mut d = IdentifyMassStorage::default();
    parse_descriptors(HID_THEN_MSC, &mut d);
    assert_eq!(d.identify(), Some(2));
    assert_eq!(d.interface(), Some(1));
}

#[test]
fn identify_rejects_uas() {
    let mut d = IdentifyMassStorage::default();
    parse_descriptors(UAS_ONLY, &mut d);
    assert_eq!(d.identify(), None);
    assert_eq!(d.interface(), None);
}

#[test]
fn identify_nothing() {
    let d = IdentifyMassStorage::default();
    assert_eq!(d.identify(), None);
}
