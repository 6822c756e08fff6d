use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::command::{Command, Envelope};
use crate::data::CredentialValidator;
use crate::error::LedgerError;
use crate::ledger::{self, Bag, BagState, StateManaged};
use crate::tree::Component;
use rondo_proto::DecodeError;

const USER_NAME: &str = "UserName";
const AUTHENTICATED: &str = "Authenticated";

/// Leaf login form. The user name round-trips; the password is a
/// transient field the host sets from the posted form and is never
/// captured.
pub struct LoginForm {
    bag: Bag,
    password: String,
    validator: Arc<dyn CredentialValidator>,
}

impl LoginForm {
    pub fn new(validator: Arc<dyn CredentialValidator>) -> Self {
        Self { bag: Bag::new(), password: String::new(), validator }
    }

    pub fn user_name(&self) -> &str { self.bag.get_str(USER_NAME, "") }

    pub fn set_user_name(&mut self, name: impl Into<String>) { self.bag.set(USER_NAME, name.into()); }

    pub fn set_password(&mut self, password: impl Into<String>) { self.password = password.into(); }

    pub fn is_authenticated(&self) -> bool { self.bag.get_bool(AUTHENTICATED, false) }

    pub fn login_argument() -> String { "Login$".to_owned() }
}

impl StateManaged for LoginForm {
    type Entry = BagState;

    fn track(&mut self) { self.bag.track(); }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<BagState> { self.bag.capture() }

    fn restore(&mut self, entry: BagState) -> Result<(), LedgerError> { self.bag.restore(entry) }
}

impl Component for LoginForm {
    fn kind(&self) -> &'static str { "login" }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        let (name, _) = argument.split_once('$').ok_or(DecodeError::InvalidFormat("missing command separator"))?;
        if Command::parse_named(name) != Some(Command::Login) {
            return Err(DecodeError::InvalidFormat("command not valid on a login form"));
        }
        let user = self.user_name().to_owned();
        let ok = self.validator.validate(&user, &self.password);
        debug!("LoginForm.login {} -> {}", user, ok);
        self.bag.set(AUTHENTICATED, ok);
        Ok(Some(Envelope::new(Command::Authenticated, ok)))
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
