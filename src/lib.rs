//! Core of a dynamic tiling window manager: arena-based client/monitor
//! state, an X11 transport seam behind [`xconn::XConn`], and the policy
//! modules (layout, focus, rules, bar) a front end wires together.
//!
//! `main.rs` is the only piece of this crate that talks to a real X
//! display; everything here is testable against [`xconn::fake::FakeXConn`].

pub mod atoms;
pub mod bar;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod modal;
pub mod monitor;
pub mod process;
pub mod reconcile;
pub mod rules;
pub mod tags;
pub mod wm;
pub mod xconn;
