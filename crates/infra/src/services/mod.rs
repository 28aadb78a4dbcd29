mod web_push;

pub use web_push::{
    push_audience, DisabledPushTransport, IPushTransport, InMemoryPushTransport, TransportError,
    WebPushTransport,
};
