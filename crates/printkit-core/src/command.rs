//! Decoded G-code command capability set
//!
//! The state tracker never tokenizes G-code text itself. It consumes commands
//! that an upstream tokenizer has already split into words, through the
//! [`DecodedCommand`] trait. [`CommandFields`] is a plain holder implementing
//! the trait for tokenizers that prefer to fill a struct, and for tests.

use crate::data::Axis;
use serde::{Deserialize, Serialize};

/// Presence/value accessors for one decoded G-code line
///
/// Every accessor returns `None` when the word is absent.
pub trait DecodedCommand {
    /// Text of a host pseudo-directive (e.g. `@isathome`)
    fn host_command(&self) -> Option<&str>;
    /// Line number (`N` word)
    fn line_number(&self) -> Option<u32>;
    /// G number
    fn g(&self) -> Option<u16>;
    /// M number
    fn m(&self) -> Option<u16>;
    /// Tool selector (`T` word)
    fn t(&self) -> Option<i32>;
    /// X parameter
    fn x(&self) -> Option<f64>;
    /// Y parameter
    fn y(&self) -> Option<f64>;
    /// Z parameter
    fn z(&self) -> Option<f64>;
    /// E parameter
    fn e(&self) -> Option<f64>;
    /// F parameter
    fn f(&self) -> Option<f64>;
    /// S parameter
    fn s(&self) -> Option<f64>;

    /// Parameter for the given axis
    fn axis(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x(),
            Axis::Y => self.y(),
            Axis::Z => self.z(),
            Axis::E => self.e(),
        }
    }

    /// Whether any of X, Y or Z is present
    fn has_xyz(&self) -> bool {
        self.x().is_some() || self.y().is_some() || self.z().is_some()
    }
}

/// Field holder implementing [`DecodedCommand`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandFields {
    /// Host directive text
    pub host_command: Option<String>,
    /// Line number
    pub line_number: Option<u32>,
    /// G number
    pub g: Option<u16>,
    /// M number
    pub m: Option<u16>,
    /// Tool selector
    pub t: Option<i32>,
    /// X parameter
    pub x: Option<f64>,
    /// Y parameter
    pub y: Option<f64>,
    /// Z parameter
    pub z: Option<f64>,
    /// E parameter
    pub e: Option<f64>,
    /// F parameter
    pub f: Option<f64>,
    /// S parameter
    pub s: Option<f64>,
}

impl CommandFields {
    /// Create a G command
    pub fn g(number: u16) -> Self {
        Self {
            g: Some(number),
            ..Default::default()
        }
    }

    /// Create an M command
    pub fn m(number: u16) -> Self {
        Self {
            m: Some(number),
            ..Default::default()
        }
    }

    /// Create a bare tool-select command
    pub fn tool(index: i32) -> Self {
        Self {
            t: Some(index),
            ..Default::default()
        }
    }

    /// Create a host pseudo-directive
    pub fn host(directive: impl Into<String>) -> Self {
        Self {
            host_command: Some(directive.into()),
            ..Default::default()
        }
    }

    /// Builder method to set the line number
    pub fn with_line_number(mut self, n: u32) -> Self {
        self.line_number = Some(n);
        self
    }

    /// Builder method to set the tool selector
    pub fn with_t(mut self, t: i32) -> Self {
        self.t = Some(t);
        self
    }

    /// Builder method to set X
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Builder method to set Y
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Builder method to set Z
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Builder method to set E
    pub fn with_e(mut self, e: f64) -> Self {
        self.e = Some(e);
        self
    }

    /// Builder method to set F
    pub fn with_f(mut self, f: f64) -> Self {
        self.f = Some(f);
        self
    }

    /// Builder method to set S
    pub fn with_s(mut self, s: f64) -> Self {
        self.s = Some(s);
        self
    }
}

impl DecodedCommand for CommandFields {
    fn host_command(&self) -> Option<&str> {
        self.host_command.as_deref()
    }

    fn line_number(&self) -> Option<u32> {
        self.line_number
    }

    fn g(&self) -> Option<u16> {
        self.g
    }

    fn m(&self) -> Option<u16> {
        self.m
    }

    fn t(&self) -> Option<i32> {
        self.t
    }

    fn x(&self) -> Option<f64> {
        self.x
    }

    fn y(&self) -> Option<f64> {
        self.y
    }

    fn z(&self) -> Option<f64> {
        self.z
    }

    fn e(&self) -> Option<f64> {
        self.e
    }

    fn f(&self) -> Option<f64> {
        self.f
    }

    fn s(&self) -> Option<f64> {
        self.s
    }
}
