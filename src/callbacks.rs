//! Callback slots of a client configuration.
//!
//! Callbacks are not parsed from text: they are registered with
//! [`ClientConfig::set_callback`](crate::config::ClientConfig::set_callback)
//! and shown by `get` as the address of the registered closure. Every slot is
//! independently nullable, and registering a slot again replaces the previous
//! callback.

use std::any::Any;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ErrorCode;
use crate::message::Message;
use crate::topic_partition_list::TopicPartitionList;

/// Application data passed back to callbacks.
pub type Opaque = Arc<dyn Any + Send + Sync>;

/// Delivery report, payload form: payload, delivery result, shared opaque
/// and per-message opaque.
pub type DeliveryReportCb = Arc<
    dyn Fn(Option<&[u8]>, Result<(), ErrorCode>, Option<&Opaque>, Option<&Opaque>) + Send + Sync,
>;
/// Delivery report, message form: message, shared opaque and per-message
/// opaque.
pub type DeliveryMessageCb = Arc<dyn Fn(&Message, Option<&Opaque>, Option<&Opaque>) + Send + Sync>;
/// Rebalance notification.
pub type RebalanceCb = Arc<dyn Fn(&Rebalance<'_>, Option<&Opaque>) + Send + Sync>;
/// Result of an offset commit.
pub type OffsetCommitCb =
    Arc<dyn Fn(Result<(), ErrorCode>, &TopicPartitionList, Option<&Opaque>) + Send + Sync>;
/// Consumed message.
pub type ConsumeCb = Arc<dyn Fn(&Message, Option<&Opaque>) + Send + Sync>;
/// Global error: code and reason.
pub type ErrorCb = Arc<dyn Fn(ErrorCode, &str, Option<&Opaque>) + Send + Sync>;
/// Broker throttling: broker name, broker id and throttle time.
pub type ThrottleCb = Arc<dyn Fn(&str, i32, Duration, Option<&Opaque>) + Send + Sync>;
/// Statistics, as a JSON document.
pub type StatsCb = Arc<dyn Fn(&str, Option<&Opaque>) + Send + Sync>;
/// Log line: syslog level, facility and message.
pub type LogCb = Arc<dyn Fn(i32, &str, &str) + Send + Sync>;
/// Socket creation: domain, type and protocol. Returns the new descriptor.
pub type SocketCb =
    Arc<dyn Fn(libc::c_int, libc::c_int, libc::c_int, Option<&Opaque>) -> io::Result<libc::c_int> + Send + Sync>;
/// File open: path, flags and mode. Returns the new descriptor.
pub type OpenCb =
    Arc<dyn Fn(&str, libc::c_int, u32, Option<&Opaque>) -> io::Result<libc::c_int> + Send + Sync>;
/// Partitioner: key, partition count, topic opaque and per-message opaque.
/// Returns the selected partition.
pub type PartitionerCb =
    Arc<dyn Fn(Option<&[u8]>, i32, Option<&Opaque>, Option<&Opaque>) -> i32 + Send + Sync>;

/// A rebalance event.
#[derive(Debug)]
pub enum Rebalance<'a> {
    /// New partitions are assigned.
    Assign(&'a TopicPartitionList),
    /// Partitions are revoked.
    Revoke(&'a TopicPartitionList),
    /// The rebalance failed.
    Error(ErrorCode),
}

/// A callback, tagged with the slot it is registered in.
#[derive(Clone)]
pub enum Callback {
    /// `dr_cb`.
    DeliveryReport(DeliveryReportCb),
    /// `dr_msg_cb`.
    DeliveryMessage(DeliveryMessageCb),
    /// `rebalance_cb`.
    Rebalance(RebalanceCb),
    /// `offset_commit_cb`.
    OffsetCommit(OffsetCommitCb),
    /// `consume_cb`.
    Consume(ConsumeCb),
    /// `error_cb`.
    Error(ErrorCb),
    /// `throttle_cb`.
    Throttle(ThrottleCb),
    /// `stats_cb`.
    Stats(StatsCb),
    /// `log_cb`.
    Log(LogCb),
    /// `socket_cb`.
    Socket(SocketCb),
    /// `open_cb`.
    Open(OpenCb),
}

impl Callback {
    /// Name of the property the slot is exposed as.
    pub fn slot(&self) -> &'static str {
        match *self {
            Callback::DeliveryReport(_) => "dr_cb",
            Callback::DeliveryMessage(_) => "dr_msg_cb",
            Callback::Rebalance(_) => "rebalance_cb",
            Callback::OffsetCommit(_) => "offset_commit_cb",
            Callback::Consume(_) => "consume_cb",
            Callback::Error(_) => "error_cb",
            Callback::Throttle(_) => "throttle_cb",
            Callback::Stats(_) => "stats_cb",
            Callback::Log(_) => "log_cb",
            Callback::Socket(_) => "socket_cb",
            Callback::Open(_) => "open_cb",
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Callback({})", self.slot())
    }
}

fn addr<T: ?Sized>(cb: &Arc<T>) -> *const () {
    Arc::as_ptr(cb) as *const ()
}

/// The callback slots of a client configuration, plus the opaque shared by
/// all of them.
#[derive(Clone, Default)]
pub struct CallbackTable {
    dr: Option<DeliveryReportCb>,
    dr_msg: Option<DeliveryMessageCb>,
    rebalance: Option<RebalanceCb>,
    offset_commit: Option<OffsetCommitCb>,
    consume: Option<ConsumeCb>,
    error: Option<ErrorCb>,
    throttle: Option<ThrottleCb>,
    stats: Option<StatsCb>,
    log: Option<LogCb>,
    socket: Option<SocketCb>,
    open: Option<OpenCb>,
    opaque: Option<Opaque>,
}

impl CallbackTable {
    /// Creates a table with every slot empty.
    pub fn new() -> CallbackTable {
        CallbackTable::default()
    }

    /// Registers a callback, replacing whatever the slot held.
    pub fn set(&mut self, callback: Callback) {
        match callback {
            Callback::DeliveryReport(cb) => self.dr = Some(cb),
            Callback::DeliveryMessage(cb) => self.dr_msg = Some(cb),
            Callback::Rebalance(cb) => self.rebalance = Some(cb),
            Callback::OffsetCommit(cb) => self.offset_commit = Some(cb),
            Callback::Consume(cb) => self.consume = Some(cb),
            Callback::Error(cb) => self.error = Some(cb),
            Callback::Throttle(cb) => self.throttle = Some(cb),
            Callback::Stats(cb) => self.stats = Some(cb),
            Callback::Log(cb) => self.log = Some(cb),
            Callback::Socket(cb) => self.socket = Some(cb),
            Callback::Open(cb) => self.open = Some(cb),
        }
    }

    /// Sets the opaque passed to every callback.
    pub fn set_opaque(&mut self, opaque: Option<Opaque>) {
        self.opaque = opaque;
    }

    /// The opaque passed to every callback.
    pub fn opaque(&self) -> Option<&Opaque> {
        self.opaque.as_ref()
    }

    /// Address of the callback registered under a slot name, or of the
    /// opaque for `opaque`.
    pub fn ptr_of(&self, slot: &str) -> Option<*const ()> {
        match slot {
            "dr_cb" => self.dr.as_ref().map(addr),
            "dr_msg_cb" => self.dr_msg.as_ref().map(addr),
            "rebalance_cb" => self.rebalance.as_ref().map(addr),
            "offset_commit_cb" => self.offset_commit.as_ref().map(addr),
            "consume_cb" => self.consume.as_ref().map(addr),
            "error_cb" => self.error.as_ref().map(addr),
            "throttle_cb" => self.throttle.as_ref().map(addr),
            "stats_cb" => self.stats.as_ref().map(addr),
            "log_cb" => self.log.as_ref().map(addr),
            "socket_cb" => self.socket.as_ref().map(addr),
            "open_cb" => self.open.as_ref().map(addr),
            "opaque" => self.opaque.as_ref().map(addr),
            _ => None,
        }
    }

    /// Returns `true` if something is registered under the slot name.
    pub fn is_set(&self, slot: &str) -> bool {
        self.ptr_of(slot).is_some()
    }

    /// Reports the outcome of a produced message.
    ///
    /// The message form is used when both delivery report forms are
    /// registered. With `only_error`, successful deliveries are not
    /// reported. Returns `true` if a callback was invoked.
    pub fn dispatch_delivery(
        &self,
        msg: &Message,
        msg_opaque: Option<&Opaque>,
        only_error: bool,
    ) -> bool {
        if only_error && msg.is_ok() {
            return false;
        }
        let opaque = self.opaque.as_ref();
        if let Some(ref cb) = self.dr_msg {
            cb(msg, opaque, msg_opaque);
            true
        } else if let Some(ref cb) = self.dr {
            let result = match msg.error() {
                Some(err) => Err(err),
                None => Ok(()),
            };
            cb(msg.payload(), result, opaque, msg_opaque);
            true
        } else {
            false
        }
    }

    /// Notifies a rebalance. Returns `false` if no callback is registered.
    pub fn dispatch_rebalance(&self, event: &Rebalance<'_>) -> bool {
        self.rebalance
            .as_ref()
            .map(|cb| cb(event, self.opaque.as_ref()))
            .is_some()
    }

    /// Reports the result of an offset commit.
    pub fn dispatch_offset_commit(
        &self,
        result: Result<(), ErrorCode>,
        offsets: &TopicPartitionList,
    ) -> bool {
        self.offset_commit
            .as_ref()
            .map(|cb| cb(result, offsets, self.opaque.as_ref()))
            .is_some()
    }

    /// Hands a consumed message to the consume callback.
    pub fn dispatch_consume(&self, msg: &Message) -> bool {
        self.consume
            .as_ref()
            .map(|cb| cb(msg, self.opaque.as_ref()))
            .is_some()
    }

    /// Reports a global error.
    pub fn dispatch_error(&self, code: ErrorCode, reason: &str) -> bool {
        self.error
            .as_ref()
            .map(|cb| cb(code, reason, self.opaque.as_ref()))
            .is_some()
    }

    /// Reports broker throttling.
    pub fn dispatch_throttle(&self, broker_name: &str, broker_id: i32, time: Duration) -> bool {
        self.throttle
            .as_ref()
            .map(|cb| cb(broker_name, broker_id, time, self.opaque.as_ref()))
            .is_some()
    }

    /// Emits statistics.
    pub fn dispatch_stats(&self, json: &str) -> bool {
        self.stats
            .as_ref()
            .map(|cb| cb(json, self.opaque.as_ref()))
            .is_some()
    }

    /// Emits a log line.
    pub fn dispatch_log(&self, level: i32, fac: &str, buf: &str) -> bool {
        self.log.as_ref().map(|cb| cb(level, fac, buf)).is_some()
    }

    /// The socket creation callback, or the platform default if none is
    /// registered.
    pub fn socket_cb(&self) -> SocketCb {
        match self.socket {
            Some(ref cb) => Arc::clone(cb),
            None => Arc::new(platform::socket),
        }
    }

    /// The file open callback, or the platform default if none is
    /// registered.
    pub fn open_cb(&self) -> OpenCb {
        match self.open {
            Some(ref cb) => Arc::clone(cb),
            None => Arc::new(platform::open),
        }
    }

    /// Empties every slot, returning how many were set.
    pub(crate) fn clear(&mut self) -> usize {
        let set = [
            self.dr.take().is_some(),
            self.dr_msg.take().is_some(),
            self.rebalance.take().is_some(),
            self.offset_commit.take().is_some(),
            self.consume.take().is_some(),
            self.error.take().is_some(),
            self.throttle.take().is_some(),
            self.stats.take().is_some(),
            self.log.take().is_some(),
            self.socket.take().is_some(),
            self.open.take().is_some(),
            self.opaque.take().is_some(),
        ];
        set.iter().filter(|s| **s).count()
    }
}

impl fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const SLOTS: &[&str] = &[
            "dr_cb",
            "dr_msg_cb",
            "rebalance_cb",
            "offset_commit_cb",
            "consume_cb",
            "error_cb",
            "throttle_cb",
            "stats_cb",
            "log_cb",
            "socket_cb",
            "open_cb",
            "opaque",
        ];
        f.debug_list()
            .entries(SLOTS.iter().filter(|s| self.is_set(s)))
            .finish()
    }
}

#[cfg(unix)]
mod platform {
    use std::ffi::CString;
    use std::io;

    use super::Opaque;

    pub(super) fn socket(
        domain: libc::c_int,
        type_: libc::c_int,
        protocol: libc::c_int,
        _opaque: Option<&Opaque>,
    ) -> io::Result<libc::c_int> {
        #[cfg(target_os = "linux")]
        let type_ = type_ | libc::SOCK_CLOEXEC;
        let fd = unsafe { libc::socket(domain, type_, protocol) };
        if fd == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(fd)
        }
    }

    pub(super) fn open(
        path: &str,
        flags: libc::c_int,
        mode: u32,
        _opaque: Option<&Opaque>,
    ) -> io::Result<libc::c_int> {
        let path = CString::new(path).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        #[cfg(target_os = "linux")]
        let flags = flags | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(path.as_ptr(), flags, mode as libc::c_uint) };
        if fd == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(fd)
        }
    }
}

#[cfg(not(unix))]
mod platform {
    use std::io;

    use super::Opaque;

    pub(super) fn socket(
        _domain: libc::c_int,
        _type: libc::c_int,
        _protocol: libc::c_int,
        _opaque: Option<&Opaque>,
    ) -> io::Result<libc::c_int> {
        Err(io::ErrorKind::Unsupported.into())
    }

    pub(super) fn open(
        _path: &str,
        _flags: libc::c_int,
        _mode: u32,
        _opaque: Option<&Opaque>,
    ) -> io::Result<libc::c_int> {
        Err(io::ErrorKind::Unsupported.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn last_registration_wins() {
        let mut table = CallbackTable::new();
        let first: StatsCb = Arc::new(|_: &str, _: Option<&Opaque>| {});
        let second: StatsCb = Arc::new(|_: &str, _: Option<&Opaque>| {});
        table.set(Callback::Stats(first.clone()));
        table.set(Callback::Stats(second.clone()));
        assert_eq!(table.ptr_of("stats_cb"), Some(Arc::as_ptr(&second) as *const ()));
        assert!(table.dispatch_stats("{}"));
        assert!(!table.dispatch_error(ErrorCode::AllBrokersDown, "down"));
    }

    #[test]
    fn message_form_wins() {
        let payload_calls = Arc::new(AtomicUsize::new(0));
        let message_calls = Arc::new(AtomicUsize::new(0));
        let mut table = CallbackTable::new();
        let counter = payload_calls.clone();
        table.set(Callback::DeliveryReport(Arc::new(
            move |_: Option<&[u8]>, _: Result<(), ErrorCode>, _: Option<&Opaque>, _: Option<&Opaque>| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        let counter = message_calls.clone();
        table.set(Callback::DeliveryMessage(Arc::new(
            move |_: &Message, _: Option<&Opaque>, _: Option<&Opaque>| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        let msg = Message::new("t", 0, 1);
        assert!(table.dispatch_delivery(&msg, None, false));
        assert_eq!(message_calls.load(Ordering::SeqCst), 1);
        assert_eq!(payload_calls.load(Ordering::SeqCst), 0);

        assert!(!table.dispatch_delivery(&msg, None, true));
        let failed = msg.with_error(ErrorCode::MessageTimedOut);
        assert!(table.dispatch_delivery(&failed, None, true));
        assert_eq!(message_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn opaque_reaches_callbacks() {
        let mut table = CallbackTable::new();
        table.set_opaque(Some(Arc::new(7u32)));
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        table.set(Callback::Error(Arc::new(
            move |_: ErrorCode, _: &str, opaque: Option<&Opaque>| {
            let v = opaque.and_then(|o| o.downcast_ref::<u32>()).copied();
            s.store(v.unwrap_or(0) as usize, Ordering::SeqCst);
        })));
        assert!(table.dispatch_error(ErrorCode::Other(1), "test"));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn clear_counts_set_slots() {
        let mut table = CallbackTable::new();
        table.set(Callback::Log(Arc::new(|_: i32, _: &str, _: &str| {})));
        table.set_opaque(Some(Arc::new(())));
        assert_eq!(table.clear(), 2);
        assert_eq!(table.clear(), 0);
        assert!(!table.is_set("log_cb"));
    }

    #[cfg(unix)]
    #[test]
    fn platform_defaults() {
        let table = CallbackTable::new();
        let fd = (table.open_cb())("/dev/null", libc::O_RDONLY, 0, None).unwrap();
        assert!(fd >= 0);
        unsafe { libc::close(fd) };
        assert!((table.open_cb())("/no/such/file", libc::O_RDONLY, 0, None).is_err());

        let fd = (table.socket_cb())(libc::AF_INET, libc::SOCK_STREAM, 0, None).unwrap();
        assert!(fd >= 0);
        unsafe { libc::close(fd) };
    }
}
