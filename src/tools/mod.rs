pub mod looper;
pub mod modlist;
pub mod onefile;
pub mod purge;
pub mod runc;
