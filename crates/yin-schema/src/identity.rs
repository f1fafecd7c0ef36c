use yin_common::Atom;

use crate::ids::IdentityRef;

/// An `identity` statement and its position in the base/derived DAG.
///
/// `base` and `derived` are filled in during resolution (§4.1): at
/// construction time an identity only knows its own name and the raw
/// `base` argument string, which [`crate::Context`] resolves once every
/// module in the load set is registered, so that identities may reference
/// bases declared in modules loaded after them.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: Atom,
    pub base: Option<IdentityRef>,
    pub derived: Vec<IdentityRef>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub status: crate::Status,
}

impl Identity {
    pub fn new(name: Atom) -> Self {
        Identity {
            name,
            base: None,
            derived: Vec::new(),
            description: None,
            reference: None,
            status: crate::Status::Current,
        }
    }

    /// Whether `candidate` is `root` itself or a (transitive) descendant of
    /// it, walking `derived` edges. Used to validate `identityref` default
    /// values and the like; bounded the same way typedef-chain walks are.
    pub fn is_ancestor_of(root: IdentityRef, candidate: IdentityRef, ctx: &crate::Context) -> bool {
        if root == candidate {
            return true;
        }
        let mut stack = vec![root];
        let mut seen = 0usize;
        while let Some(current) = stack.pop() {
            seen += 1;
            if seen > yin_common::limits::MAX_SCOPE_WALK_ITERATIONS {
                return false;
            }
            let identity = ctx.identity(current);
            for &child in &identity.derived {
                if child == candidate {
                    return true;
                }
                stack.push(child);
            }
        }
        false
    }
}
