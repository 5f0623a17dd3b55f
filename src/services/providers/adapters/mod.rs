//! Concrete provider APIs.
//!
//! - `bitcoin_com`: rest.bitcoin.com (BCH)
//! - `bitcore`: Bitcore node API (BCH, BTC)
//! - `blockchair`: Blockchair dashboards (BCH, BTC)
//! - `btc_com`: BTC.com chain API (BCH, BTC)
//! - `esplora`: Esplora REST, e.g. blockstream.info and mempool.space (BTC)

mod bitcoin_com;
mod bitcore;
mod blockchair;
mod btc_com;
pub mod common;
mod esplora;

pub use bitcoin_com::BitcoinComAdapter;
pub use bitcore::BitcoreAdapter;
pub use blockchair::BlockchairAdapter;
pub use btc_com::BtcComAdapter;
pub use esplora::EsploraAdapter;
