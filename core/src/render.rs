use crate::authority::TokenAuthority;
use rondo_proto::{InteractionToken, NodePath, TreeId};

/// Handed to components while the rendering layer walks the tree. Every
/// interactive element asks for a token here, which both produces the
/// embeddable string and registers it with the authority for the next
/// round trip's validation.
pub struct RenderContext<'a> {
    tree: TreeId,
    authority: &'a dyn TokenAuthority,
}

impl<'a> RenderContext<'a> {
    pub fn new(tree: TreeId, authority: &'a dyn TokenAuthority) -> Self { Self { tree, authority } }

    pub fn tree(&self) -> TreeId { self.tree }

    /// Encode a logical action on the node at `path` into a token.
    /// Deterministic: the same (path, argument) always yields the same
    /// token within one generation.
    pub fn postback_token(&self, path: &NodePath, argument: impl Into<String>) -> InteractionToken {
        let token = InteractionToken::new(self.tree, path.clone(), argument);
        self.authority.register(&token);
        token
    }
}
