pub mod boolean;
pub mod events;
pub mod pair;
pub mod uid;

pub use boolean::*;
pub use events::*;
pub use pair::*;
pub use uid::*;
