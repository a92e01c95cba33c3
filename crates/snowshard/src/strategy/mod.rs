mod balanced;
mod dst;
mod interface;
mod modulo;

pub use balanced::*;
pub use dst::*;
pub use interface::*;
pub use modulo::*;
