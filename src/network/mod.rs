//! Reactor network: the object traits, the network itself and its builder
pub mod reactor_net;
pub mod system_builder;
pub mod traits;
