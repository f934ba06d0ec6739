/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Ordered registry of the error codes a service can return

use std::fmt;

/// Builds a typed error from the generic error parsed out of a response and the raw body.
/// The raw body is passed along so that errors with extra modeled fields can read them.
pub type ErrorConstructor<E> = fn(smithy_types::Error, &[u8]) -> E;

/// Maps wire error codes to constructors of typed errors
///
/// Entries are scanned in registration order and the first entry whose code equals the
/// response's code wins. When nothing matches, the fallback turns the generic error into the
/// service's "unhandled" variant, so classification always produces exactly one error.
///
/// A table is built once when a client is constructed and is only read afterwards, so it can
/// be shared between concurrent calls behind an `Arc`.
pub struct ErrorTable<E> {
    entries: Vec<(&'static str, ErrorConstructor<E>)>,
    fallback: fn(smithy_types::Error) -> E,
}

impl<E> ErrorTable<E> {
    pub fn builder(fallback: fn(smithy_types::Error) -> E) -> Builder<E> {
        Builder {
            entries: Vec::new(),
            fallback,
        }
    }

    /// The constructor registered first for `code`
    pub fn lookup(&self, code: &str) -> Option<ErrorConstructor<E>> {
        self.entries
            .iter()
            .find(|(registered, _)| *registered == code)
            .map(|(_, constructor)| *constructor)
    }

    pub fn classify(&self, generic: smithy_types::Error, body: &[u8]) -> E {
        match generic.code().and_then(|code| self.lookup(code)) {
            Some(constructor) => constructor(generic, body),
            None => {
                tracing::debug!(code = ?generic.code(), "error code not in error table");
                (self.fallback)(generic)
            }
        }
    }

    /// Builds the fallback error directly, without consulting the registered codes
    pub fn unhandled(&self, generic: smithy_types::Error) -> E {
        (self.fallback)(generic)
    }

    /// Registered codes in table order
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> fmt::Debug for ErrorTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorTable")
            .field("codes", &self.codes().collect::<Vec<_>>())
            .finish()
    }
}

pub struct Builder<E> {
    entries: Vec<(&'static str, ErrorConstructor<E>)>,
    fallback: fn(smithy_types::Error) -> E,
}

impl<E> Builder<E> {
    /// Appends an entry. Registering a code twice keeps the first registration reachable.
    pub fn register(mut self, code: &'static str, constructor: ErrorConstructor<E>) -> Self {
        self.entries.push((code, constructor));
        self
    }

    pub fn build(self) -> ErrorTable<E> {
        ErrorTable {
            entries: self.entries,
            fallback: self.fallback,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ErrorTable;

    #[derive(Debug, PartialEq)]
    enum TestError {
        NotFound(Option<String>),
        Specific,
        Loose,
        Unhandled(smithy_types::Error),
    }

    fn table() -> ErrorTable<TestError> {
        ErrorTable::builder(TestError::Unhandled)
            .register("NotFoundException", |generic, _| {
                TestError::NotFound(generic.message().map(|m| m.to_string()))
            })
            .register("Conflict", |_, _| TestError::Specific)
            .register("Conflict", |_, _| TestError::Loose)
            .build()
    }

    fn generic(code: &str) -> smithy_types::Error {
        smithy_types::Error::builder()
            .code(code)
            .message("boom")
            .build()
    }

    #[test]
    fn registered_code_builds_typed_error() {
        assert_eq!(
            table().classify(generic("NotFoundException"), b"{}"),
            TestError::NotFound(Some("boom".to_string()))
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(table().classify(generic("Conflict"), b"{}"), TestError::Specific);
    }

    #[test]
    fn unknown_and_missing_codes_fall_back() {
        assert_eq!(
            table().classify(generic("Teapot"), b"{}"),
            TestError::Unhandled(generic("Teapot"))
        );
        let no_code = smithy_types::Error::builder().message("no code").build();
        assert_eq!(
            table().classify(no_code.clone(), b""),
            TestError::Unhandled(no_code)
        );
    }

    #[test]
    fn codes_keep_registration_order() {
        let table = table();
        assert_eq!(
            table.codes().collect::<Vec<_>>(),
            vec!["NotFoundException", "Conflict", "Conflict"]
        );
        assert_eq!(table.len(), 3);
    }
}
