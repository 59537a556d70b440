use clap::Parser;
use parcel_access::app::{AccessApp, AccessError};

fn main() -> Result<(), AccessError> {
    env_logger::init();
    let args = AccessApp::parse();
    args.op.run()
}
