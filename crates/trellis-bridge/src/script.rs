//! The JavaScript half of the bridge, injected into every WebView as an
//! initialization script.
//!
//! The guest API mirrors the host contracts:
//! - `window.trellis.request(name, payload)` returns a promise for the
//!   reply. The channel carries one call at a time, so a second request
//!   while one is pending resolves immediately to a busy failure without
//!   touching the wire.
//! - `window.trellis.events.on(name, callback)` subscribes to host events
//!   and returns a handle whose `dispose()` removes exactly that callback
//!   (idempotent).
//!
//! The host delivers responses and events by evaluating
//! `window.__TRELLIS__.deliver(<envelope-json>)` (see [`js_deliver`]).

/// Injected into the WebView before any guest code runs.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function () {
    if (window.trellis) { return; }

    // One call, one return: a single pending resolver is the only
    // correlation state the channel has.
    var pending = { resolve: null };
    var subscribers = {};
    var nextSubId = 1;

    window.trellis = {
        request: function (name, payload) {
            if (pending.resolve) {
                return Promise.resolve({
                    Success: false,
                    Error: 'a request is already in flight',
                    Data: null
                });
            }
            return new Promise(function (resolve) {
                pending.resolve = resolve;
                window.ipc.postMessage(JSON.stringify({
                    type: 'request',
                    name: name,
                    payload: payload === undefined ? null : payload
                }));
            });
        },

        events: {
            on: function (name, callback) {
                var id = nextSubId++;
                if (!subscribers[name]) { subscribers[name] = []; }
                subscribers[name].push({ id: id, cb: callback });
                return {
                    dispose: function () {
                        var list = subscribers[name] || [];
                        for (var i = 0; i < list.length; i++) {
                            if (list[i].id === id) { list.splice(i, 1); return; }
                        }
                    }
                };
            }
        }
    };

    window.__TRELLIS__ = {
        deliver: function (message) {
            var envelope;
            try {
                envelope = typeof message === 'string' ? JSON.parse(message) : message;
            } catch (err) {
                console.error('[trellis] malformed message from host', err);
                return;
            }

            if (envelope.type === 'response') {
                var resolve = pending.resolve;
                pending.resolve = null;
                if (resolve) { resolve(envelope.result); }
                return;
            }

            if (envelope.type === 'event') {
                // Local subscriber shape: {name, payload}.
                var local = { name: envelope.name, payload: envelope.payload };
                var list = (subscribers[envelope.name] || []).slice();
                for (var i = 0; i < list.length; i++) {
                    try {
                        list[i].cb(local.payload, local);
                    } catch (err) {
                        console.error('[trellis] event subscriber failed', err);
                    }
                }
            }
        }
    };
})();
"#;

/// JS statement delivering one encoded envelope to the guest bridge.
pub fn js_deliver(envelope_json: &str) -> String {
    let literal = serde_json::to_string(envelope_json)
        .unwrap_or_else(|_| "\"\"".to_string());
    format!("window.__TRELLIS__ && window.__TRELLIS__.deliver({literal});")
}
