pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod projection;
pub mod server;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
