/*!
The active logic (spec §6, `set-logic`): a name plus the capability flags the
internalizer consults to report `UnsupportedConstructInLogic` precisely (spec §4.3).
*/

/// A recognized (or not) SMT-LIB logic name and what it licenses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogicName {
    pub name: String,
    pub supports_uf: bool,
    pub supports_arithmetic: bool,
    pub supports_arrays: bool,
    pub supports_quantifiers: bool,
    pub supports_nonlinear: bool,
}

impl LogicName {
    /// Parses a logic name into its capability flags, following the common
    /// SMT-LIB naming convention (`QF_` prefix for quantifier-free, letters for
    /// theory combinators: `UF`, `BV`, `A` for arrays, `LIA`/`LRA`/`NIA`/`NRA` for
    /// arithmetic fragments). Unrecognized tokens are conservatively unsupported,
    /// so an unknown logic decides nothing extra rather than silently accepting
    /// constructs it wasn't asked to support.
    pub fn parse(name: &str) -> Self {
        let quantifier_free = name.starts_with("QF_");
        let body = name.strip_prefix("QF_").unwrap_or(name);

        LogicName {
            name: name.to_string(),
            supports_uf: body.contains("UF"),
            supports_arithmetic: body.contains("IDL")
                || body.contains("RDL")
                || body.contains("LIA")
                || body.contains("LRA")
                || body.contains("NIA")
                || body.contains("NRA"),
            supports_arrays: body.contains("ABV") || body.contains("AX") || body.contains("AUF"),
            supports_quantifiers: !quantifier_free,
            supports_nonlinear: body.contains("NIA") || body.contains("NRA"),
        }
    }

    /// Whether this logic is (some flavor of) the quantifier-free bit-vector
    /// fragment this core actually decides.
    pub fn is_qf_bv(&self) -> bool {
        self.name == "QF_BV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qf_bv_supports_nothing_extra() {
        let logic = LogicName::parse("QF_BV");
        assert!(logic.is_qf_bv());
        assert!(!logic.supports_uf);
        assert!(!logic.supports_arithmetic);
        assert!(!logic.supports_quantifiers);
    }

    #[test]
    fn qf_ufbv_supports_uf() {
        let logic = LogicName::parse("QF_UFBV");
        assert!(logic.supports_uf);
        assert!(!logic.supports_quantifiers);
    }

    #[test]
    fn non_qf_supports_quantifiers() {
        let logic = LogicName::parse("BV");
        assert!(logic.supports_quantifiers);
    }
}
