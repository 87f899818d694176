#![allow(dead_code)]
#![allow(unused_imports)]

mod fakes;
mod harness;

pub use fakes::{JsonCodec, JsonQuery, ManualTimer, ScriptedTransport, SequentialIds};
pub use harness::{answer_for, servers, Harness, FIRST_ID};
