//! 用户记录：模型、存储、外部数据源、导出与路由

pub mod export;
pub mod handler;
pub mod memory;
pub mod model;
#[cfg(feature = "database")]
pub mod postgres;
pub mod service;
pub mod source;
pub mod store;

pub use memory::MemoryUserStore;
pub use model::{NewUser, User, UserFields, UserInput, UserPatch};
#[cfg(feature = "database")]
pub use postgres::PgUserStore;
pub use service::UserService;
pub use source::UserSource;
pub use store::{SortOrder, UserStore};
