//! Domain types shared across the meshcache crates

pub mod byte_view;
pub mod capabilities;

pub use byte_view::ByteView;
pub use capabilities::{
    DataSource, DataSourceFn, EvictionCallback, FetchRequest, FetchResponse, PeerGetter,
    PeerPicker,
};
