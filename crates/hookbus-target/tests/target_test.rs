//! Integration tests for tracked, access-controlled hook targets.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use hookbus_core::{BusError, BusResult, ErrorKind};
use hookbus_target::prelude::*;

/// Recording hook engine standing in for a real dispatch implementation.
#[derive(Default)]
struct FakeHook {
    taps: Mutex<Vec<(&'static str, String)>>,
    calls: Mutex<Vec<Vec<Value>>>,
    intercepts: Mutex<Vec<Value>>,
    pending: Mutex<Option<Done>>,
    return_value: Value,
    reject: bool,
}

impl FakeHook {
    fn returning(value: Value) -> Arc<Self> {
        Arc::new(Self {
            return_value: value,
            ..Self::default()
        })
    }

    fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            ..Self::default()
        })
    }

    fn taps(&self) -> Vec<(&'static str, String)> {
        self.taps.lock().unwrap().clone()
    }

    fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.lock().unwrap().clone()
    }

    /// Complete the stored callback-style invocation.
    fn complete(&self, returned: Vec<Value>) {
        let done = self.pending.lock().unwrap().take().expect("pending done");
        done(returned);
    }
}

impl fmt::Debug for FakeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeHook").finish_non_exhaustive()
    }
}

#[async_trait]
impl Tapable for FakeHook {
    fn tap(&self, label: &str, _interceptor: SyncTap) -> BusResult<()> {
        self.taps.lock().unwrap().push(("tap", label.to_string()));
        Ok(())
    }

    fn tap_async(&self, label: &str, _interceptor: AsyncTap) -> BusResult<()> {
        self.taps
            .lock()
            .unwrap()
            .push(("tapAsync", label.to_string()));
        Ok(())
    }

    fn tap_promise(&self, label: &str, _interceptor: PromiseTap) -> BusResult<()> {
        self.taps
            .lock()
            .unwrap()
            .push(("tapPromise", label.to_string()));
        Ok(())
    }

    fn call(&self, args: &[Value]) -> BusResult<Value> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(self.return_value.clone())
    }

    fn call_async(&self, args: Vec<Value>, done: Done) -> BusResult<()> {
        self.calls.lock().unwrap().push(args);
        *self.pending.lock().unwrap() = Some(done);
        Ok(())
    }

    async fn promise(&self, args: Vec<Value>) -> BusResult<Value> {
        if self.reject {
            return Err(BusError::hook("delegate rejected"));
        }
        self.calls.lock().unwrap().push(args);
        Ok(self.return_value.clone())
    }

    fn intercept(&self, options: InterceptOptions) -> BusResult<()> {
        self.intercepts.lock().unwrap().push(options.describe());
        Ok(())
    }
}

struct Fixture {
    tracking: Arc<Tracking>,
    buffer: Arc<BufferSink>,
    hook: Arc<FakeHook>,
    target: Target,
}

fn fixture(hook: Arc<FakeHook>, requestor: &str) -> Fixture {
    let tracking = Arc::new(Tracking::enabled());
    let buffer = BufferSink::new();
    let owner = Owner::root("Foo", &tracking, buffer.sink()).expect("owner");
    let target = Target::for_requestor(
        owner,
        requestor,
        "transformModules",
        HookKind::AsyncSeries,
        hook.clone(),
    )
    .expect("target");
    Fixture {
        tracking,
        buffer,
        hook,
        target,
    }
}

fn noop_tap() -> SyncTap {
    Arc::new(|_| None)
}

#[test]
fn test_call_forwards_args_and_tracks_before_after() {
    let fx = fixture(FakeHook::returning(json!("made-it")), "Foo");

    let returned = fx.target.call(vec![json!("a"), json!("b")]).expect("call");
    assert_eq!(returned, json!("made-it"));
    assert_eq!(fx.hook.calls(), vec![vec![json!("a"), json!("b")]]);

    let records = fx.buffer.records();
    assert_eq!(fx.buffer.events(), vec!["beforeCall", "afterCall"]);
    assert_eq!(records[0].args, vec![json!("a"), json!("b")]);
    assert_eq!(
        records[1].args,
        vec![json!("made-it"), json!("a"), json!("b")]
    );
}

#[test]
fn test_tap_without_label_uses_requestor() {
    let fx = fixture(FakeHook::returning(Value::Null), "Foo");

    fx.target.tap(None, noop_tap()).expect("tap");
    assert_eq!(fx.hook.taps(), vec![("tap", "Foo".to_string())]);

    let records = fx.buffer.records();
    assert_eq!(records[0].event, "tap");
    assert_eq!(
        records[0].args,
        vec![json!({"requestor": "Foo", "interceptor": "Foo"})]
    );
}

#[test]
fn test_tap_with_custom_label_qualifies_requestor() {
    let fx = fixture(FakeHook::returning(Value::Null), "Bar");

    fx.target
        .tap(Some("customLabel"), noop_tap())
        .expect("tap");
    assert_eq!(fx.hook.taps(), vec![("tap", "Bar:customLabel".to_string())]);

    let records = fx.buffer.records();
    assert_eq!(
        records[0].args,
        vec![json!({"requestor": "Bar", "interceptor": "Bar:customLabel"})]
    );
}

#[test]
fn test_tap_async_and_tap_promise_forward_labels() {
    let fx = fixture(FakeHook::returning(Value::Null), "Bar");

    let async_tap: AsyncTap = Arc::new(|_, done| done(Vec::new()));
    fx.target.tap_async(None, async_tap).expect("tapAsync");
    let promise_tap: PromiseTap =
        Arc::new(|_| Box::pin(async { Ok::<Option<Value>, BusError>(None) }));
    fx.target
        .tap_promise(Some("late"), promise_tap)
        .expect("tapPromise");

    assert_eq!(
        fx.hook.taps(),
        vec![
            ("tapAsync", "Bar".to_string()),
            ("tapPromise", "Bar:late".to_string()),
        ]
    );
    assert_eq!(fx.buffer.events(), vec!["tapAsync", "tapPromise"]);
}

#[test]
fn test_target_identity_hangs_under_owner() {
    let fx = fixture(FakeHook::returning(Value::Null), "Foo");

    let serialized = fx.target.node().serialize().expect("serialize");
    assert_eq!(serialized.node_type, "Target");
    assert_eq!(serialized.id, "transformModules[AsyncSeriesHook]");
    let parent = serialized.parent.as_ref().expect("parent");
    assert_eq!(parent.id, "Foo");
}

#[test]
fn test_for_requestor_selects_variant() {
    let fx = fixture(FakeHook::returning(Value::Null), "Foo");
    assert!(!fx.target.is_restricted());

    let external = fixture(FakeHook::returning(Value::Null), "Bar");
    assert!(external.target.is_restricted());
}

#[test]
fn test_external_target_rejects_invocation_but_allows_tap() {
    let fx = fixture(FakeHook::returning(Value::Null), "Bar");

    let err = fx.target.call(Vec::new()).expect_err("call must fail");
    assert_eq!(err.kind, ErrorKind::Authorization);
    for token in ["Bar", "Foo", "transformModules", "call"] {
        assert!(
            err.message.contains(token),
            "message {:?} missing {token:?}",
            err.message
        );
    }

    let err = fx
        .target
        .call_async(Vec::new(), Box::new(|_| {}))
        .expect_err("callAsync must fail");
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(err.message.contains("callAsync"));

    fx.target.tap(None, noop_tap()).expect("tap still allowed");
    assert_eq!(fx.hook.taps(), vec![("tap", "Bar".to_string())]);
    // No before/after invocation events were emitted, only the tap record.
    assert_eq!(fx.buffer.events(), vec!["tap"]);
    assert!(fx.hook.calls().is_empty());
}

#[tokio::test]
async fn test_external_target_rejects_promise() {
    let fx = fixture(FakeHook::returning(Value::Null), "Bar");

    let err = fx
        .target
        .promise(Vec::new())
        .await
        .expect_err("promise must fail");
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(err.message.contains("promise"));
}

#[test]
fn test_call_async_tracks_before_callback_runs() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let tracking = Arc::new(Tracking::enabled());
    let sink_log = Arc::clone(&log);
    let sink: TrackSink = Arc::new(move |record| {
        sink_log.lock().unwrap().push(format!("sink:{}", record.event));
        None
    });
    let owner = Owner::root("Foo", &tracking, sink).expect("owner");
    let hook = FakeHook::returning(Value::Null);
    let target = Target::owned(
        owner,
        "Foo",
        "transformModules",
        HookKind::AsyncSeries,
        hook.clone(),
    )
    .expect("target");

    let cb_log = Arc::clone(&log);
    let done: Done = Box::new(move |returned| {
        cb_log
            .lock()
            .unwrap()
            .push(format!("cb:{}", json!(returned)));
    });
    target
        .call_async(vec![json!(1), json!(2)], done)
        .expect("callAsync");

    // Delegate received the data arguments; completion happens later.
    assert_eq!(hook.calls(), vec![vec![json!(1), json!(2)]]);
    assert_eq!(log.lock().unwrap().as_slice(), ["sink:beforeCallAsync"]);

    hook.complete(vec![Value::Null, json!("result")]);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        [
            "sink:beforeCallAsync",
            "sink:afterCallAsync",
            "cb:[null,\"result\"]",
        ]
    );
}

#[tokio::test]
async fn test_promise_tracks_fulfillment_before_resolution() {
    let fx = fixture(FakeHook::returning(json!(7)), "Foo");

    let returned = fx
        .target
        .promise(vec![json!("x")])
        .await
        .expect("promise");
    assert_eq!(returned, json!(7));

    let records = fx.buffer.records();
    assert_eq!(fx.buffer.events(), vec!["beforePromise", "afterPromise"]);
    assert_eq!(
        records[1].args,
        vec![json!({"returned": 7}), json!("x")]
    );
}

#[tokio::test]
async fn test_promise_rejection_skips_after_event() {
    let fx = fixture(FakeHook::rejecting(), "Foo");

    let err = fx
        .target
        .promise(vec![json!("x")])
        .await
        .expect_err("rejection propagates");
    assert_eq!(err.kind, ErrorKind::Hook);
    assert_eq!(fx.buffer.events(), vec!["beforePromise"]);
}

#[test]
fn test_intercept_tracks_and_forwards() {
    let fx = fixture(FakeHook::returning(Value::Null), "Bar");

    let options = InterceptOptions::new().with_name("audit").with_on_tap(|_| {});
    fx.target.intercept(options).expect("intercept");

    assert_eq!(fx.buffer.events(), vec!["tapableIntercept"]);
    assert_eq!(
        fx.hook.intercepts.lock().unwrap().as_slice(),
        [json!({"name": "audit", "call": false, "tap": true, "register": false})]
    );
}

#[test]
fn test_disabled_tracking_still_forwards() {
    let fx = fixture(FakeHook::returning(json!("quiet")), "Foo");
    fx.tracking.disable();

    let returned = fx.target.call(vec![json!(1)]).expect("call");
    assert_eq!(returned, json!("quiet"));
    assert_eq!(fx.hook.calls(), vec![vec![json!(1)]]);
    assert!(fx.buffer.is_empty());
}
