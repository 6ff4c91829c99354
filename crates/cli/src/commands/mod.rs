mod apply;
mod hash;
mod new;
mod show;

pub use apply::Apply;
pub use hash::Hash;
pub use new::New;
pub use show::Show;
