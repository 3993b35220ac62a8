//! Configuration section definitions.
//!
//! Each module corresponds to a section in `relive.toml`:
//!
//! | Module    | TOML Section | Purpose                                |
//! |-----------|--------------|----------------------------------------|
//! | `connect` | `[connect]`  | Allow list, endpoint, reconnect budget |
//! | `page`    | `[page]`     | Child command, state file, store       |
//! | `reload`  | `[reload]`   | Reload delay, snapshot key             |

mod connect;
mod page;
mod reload;

pub use connect::ConnectConfig;
pub use page::PageConfig;
pub use reload::ReloadConfig;
