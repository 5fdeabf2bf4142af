pub mod component;
pub mod observer;
pub mod source;

pub use component::{
    setup_fn, ComponentRecord, Exports, Imports, PackageMeta, Service, Setup, SetupFailure,
    SetupFn, SetupResult,
};
pub use observer::{BootstrapPhase, LifecycleObserver, NoopObserver};
pub use source::ComponentSource;
