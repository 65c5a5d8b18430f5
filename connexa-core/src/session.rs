//! Identity held by a view while it talks to the backend.
//!
//! There is no login round-trip: the admin key or member id itself is sent as
//! a header on every call, so "logged in" just means a non-empty secret is
//! held. The role marker fixes which header a session produces.

use std::fmt;
use std::marker::PhantomData;

pub trait Role: 'static {
    const HEADER: &'static str;
    const MISSING: &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Member;

impl Role for Admin {
    const HEADER: &'static str = "X-ADMIN-KEY";
    const MISSING: &'static str = "Informe a chave de administrador";
}

impl Role for Member {
    const HEADER: &'static str = "X-MEMBER-ID";
    const MISSING: &'static str = "Informe seu Member ID";
}

pub struct Session<R: Role> {
    secret: String,
    _role: PhantomData<R>,
}

pub type AdminSession = Session<Admin>;
pub type MemberSession = Session<Member>;

impl<R: Role> Session<R> {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            _role: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }

    pub fn is_active(&self) -> bool {
        !self.secret.trim().is_empty()
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn header(&self) -> (&'static str, &str) {
        (R::HEADER, &self.secret)
    }

    pub fn clear(&mut self) {
        self.secret.clear();
    }
}

impl<R: Role> Clone for Session<R> {
    fn clone(&self) -> Self {
        Self::new(self.secret.clone())
    }
}

impl<R: Role> Default for Session<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: Role> PartialEq for Session<R> {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret
    }
}

impl<R: Role> fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("header", &R::HEADER)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_follows_role() {
        assert_eq!(AdminSession::new("k").header(), ("X-ADMIN-KEY", "k"));
        assert_eq!(MemberSession::new("m-1").header(), ("X-MEMBER-ID", "m-1"));
    }

    #[test]
    fn clear_ends_the_session() {
        let mut session = MemberSession::new("member-123");
        assert!(session.is_active());
        session.clear();
        assert!(!session.is_active());
        assert!(!MemberSession::new("   ").is_active());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", AdminSession::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
