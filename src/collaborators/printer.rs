/*!
Pretty-printing of terms and models is out of scope (spec §1); the command driver
still needs to render query responses, so it consumes an implementation of this
trait rather than formatting terms itself.
*/

use crate::structures::term::TermId;
use crate::term_store::TermStore;

/// Renders a term as SMT-LIB syntax. The concrete implementation (symbol names,
/// indentation, `let`-sharing of common subterms, ...) lives with the collaborator
/// named in spec §1; this core only specifies the seam.
pub trait TermPrinter {
    fn print(&self, store: &TermStore, term: TermId) -> String;
}

/// A minimal printer good enough for the core's own tests and the demo binary: no
/// sharing, no line wrapping, just enough structure to be legible.
#[derive(Default)]
pub struct DebugPrinter;

impl TermPrinter for DebugPrinter {
    fn print(&self, store: &TermStore, term: TermId) -> String {
        render(store, term)
    }
}

fn render(store: &TermStore, term: TermId) -> String {
    use crate::structures::kind::TermKind;

    if term.is_negated() {
        return format!("(not {})", render(store, term.positive()));
    }

    match store.kind_of(term) {
        TermKind::BoolConstant(b) => b.to_string(),
        TermKind::Uninterpreted { name } => name.to_string(),
        TermKind::BvConstant(v) => v.to_string(),
        TermKind::BvArray { bits } => format!(
            "(bv-array {})",
            bits.iter()
                .map(|b| render(store, *b))
                .collect::<Vec<_>>()
                .join(" ")
        ),
        TermKind::BvPoly {
            constant,
            monomials,
            width,
        } => {
            let mut s = format!("(bvadd {constant:?}", constant = constant);
            for m in monomials {
                s.push_str(&format!(" (bvmul {:?} {})", m.coeff, render(store, m.var)));
            }
            s.push_str(&format!(" :width {width})"));
            s
        }
        TermKind::BitSelect { base, index } => format!("((_ bit {index}) {})", render(store, *base)),
        TermKind::Extract { base, low, len } => {
            format!("((_ extract {} {}) {})", low + len - 1, low, render(store, *base))
        }
        TermKind::Apply { name, args } => format!(
            "({name} {})",
            args.iter()
                .map(|a| render(store, *a))
                .collect::<Vec<_>>()
                .join(" ")
        ),
        TermKind::Ite {
            cond,
            then_branch,
            else_branch,
        } => format!(
            "(ite {} {} {})",
            render(store, *cond),
            render(store, *then_branch),
            render(store, *else_branch)
        ),
        TermKind::Eq { lhs, rhs } => format!("(= {} {})", render(store, *lhs), render(store, *rhs)),
        TermKind::Not(t) => format!("(not {})", render(store, *t)),
        TermKind::Or(args) => format!(
            "(or {})",
            args.iter()
                .map(|a| render(store, *a))
                .collect::<Vec<_>>()
                .join(" ")
        ),
        TermKind::BvCompare { op, lhs, rhs } => {
            format!("({op:?} {} {})", render(store, *lhs), render(store, *rhs))
        }
        TermKind::BvArith { op, lhs, rhs } => {
            format!("({op:?} {} {})", render(store, *lhs), render(store, *rhs))
        }
        TermKind::Forall { body, .. } => format!("(forall (...) {})", render(store, *body)),
        TermKind::Exists { body, .. } => format!("(exists (...) {})", render(store, *body)),
    }
}
