//! Node pools and the channels behind them

pub mod address;
pub mod channel;
pub mod consensus;
pub mod in_process;
pub mod mirror;
pub mod node;
pub mod pool;
pub mod tls;

pub use address::{NodeAddress, TransportConfig};
pub use channel::{CallGuard, ChannelSettings, ManagedChannel};
pub use consensus::{ConsensusNetwork, ConsensusNode, LedgerId};
pub use mirror::{MirrorNetwork, MirrorNode};
pub use node::{Node, NodeKey};
pub use pool::{Network, NetworkSettings};
