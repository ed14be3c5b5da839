use thiserror::Error;

/// Failure modes for the `Resource`/record wire codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported resource version: {0}")]
    BadVersion(u8),

    #[error("non-printable byte in compressed string: 0x{0:02x}")]
    NonPrintable(u8),

    #[error("symbol table index {index} out of range (table has {table_len} entries)")]
    BadSymbolIndex { index: u8, table_len: usize },

    #[error("decoded string length {0} exceeds the 255-byte limit")]
    StringTooLarge(usize),

    #[error("unexpected end of buffer while decoding {0}")]
    Truncated(&'static str),

    #[error("record count {0} exceeds the 255-record limit")]
    TooManyRecords(usize),

    #[error("symbol table has {0} entries, exceeding the 127-entry limit")]
    TooManySymbols(usize),

    #[error("field {field} length {len} exceeds limit {limit}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("more than one {0} record present")]
    DuplicateSingleton(&'static str),

    #[error("invalid covenant-target combination: {0}")]
    InvalidTarget(&'static str),

    #[error("malformed IP pointer label: {0}")]
    BadPointer(&'static str),
}

/// A queried name violates the root zone's legal character/length set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("label {0:?} exceeds 63 octets")]
    LabelTooLong(String),

    #[error("name exceeds 255 octets total")]
    NameTooLong,

    #[error("name contains an octet outside the root-legal set: 0x{0:02x}")]
    IllegalOctet(u8),

    #[error("empty label in name")]
    EmptyLabel,
}

/// Fatal misconfiguration detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid key material at {path}: {reason}")]
    BadKey { path: String, reason: String },

    #[error("invalid bind port: {0}")]
    BadPort(String),

    #[error("unresolvable host: {0}")]
    UnresolvableHost(String),

    #[error("failed to parse config file {path}: {reason}")]
    ParseFailure { path: String, reason: String },
}

/// Top-level error type shared across the workspace.
///
/// Each crate produces its own narrow error when it can; this is the type that
/// crosses crate boundaries (application ports, the request dispatcher, CLI
/// bootstrap) since those call sites generally just need to log-and-continue
/// or log-and-exit rather than match on a specific decode failure.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("name error: {0}")]
    Name(#[from] NameError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("malformed inbound packet: {0}")]
    Protocol(String),
}
