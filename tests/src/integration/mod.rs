//! Integration tests across the document subsystems.

#[cfg(test)]
mod harness;
#[cfg(test)]
mod flows;
#[cfg(test)]
mod properties;
