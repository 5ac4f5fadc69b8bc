/*!
Small generic utilities used elsewhere in the library, kept free of any dependency on
[context](crate::context) or [structures](crate::structures) so they may be reused in
isolation.
*/

pub mod minimal_pcg;
