//! Test suites for the Fresco daemon.

mod socket_behaviour;
mod support;
mod unit;
