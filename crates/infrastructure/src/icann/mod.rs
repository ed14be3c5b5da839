pub mod stub;

pub use stub::StubIcannFallback;
