/*!
Canonical data types shared across the library: term identifiers, sorts, and the
closed set of term kinds.
*/

pub mod bv_value;
pub mod coeff;
pub mod kind;
pub mod sort;
pub mod term;
