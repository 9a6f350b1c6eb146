// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Boxed error produced by an admin transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The response body did not decode into the expected document.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Error raised by the transport, passed through untouched.
    #[error(transparent)]
    Transport(BoxError),

    #[error("invalid admin request: {0}")]
    InvalidRequest(String),

    #[error("erasure set id {id} does not match its key {set} in pool {pool}")]
    SetIdMismatch { pool: usize, set: usize, id: usize },

    #[error("inconsistent pool layout: {field} has {got} entries, expected {expected}")]
    InconsistentPoolLayout {
        field: &'static str,
        got: usize,
        expected: usize,
    },
}

impl Error {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Transport(err.into())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}
