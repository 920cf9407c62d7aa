// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A single registry holds queues carrying unrelated payload types — the
//! original library passed `void *` plus a length; here every post wraps its
//! payload in a type-erased [`Message`] envelope instead, so ownership
//! transfers through `Box`/`Any` rather than a raw pointer, and a message
//! that cannot be delivered is handed back to the caller instead of leaked.

use std::any::Any;

pub struct Message(Box<dyn Any + Send>);

impl Message {
    pub fn new<T: Send + 'static>(value: T) -> Self { Self(Box::new(value)) }

    /// Recovers the original payload if `T` matches what was posted,
    /// otherwise hands the envelope back unchanged.
    ///
    /// # Errors
    /// Returns the original `Message` if `T` does not match the payload type
    /// that was posted.
    pub fn downcast<T: Send + 'static>(self) -> Result<T, Self> {
        match self.0.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(boxed) => Err(Self(boxed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_recovers_the_original_value() {
        let msg = Message::new(42u32);
        assert_eq!(msg.downcast::<u32>().unwrap(), 42);
    }

    #[test]
    fn downcast_to_wrong_type_returns_the_envelope() {
        let msg = Message::new(42u32);
        let msg = msg.downcast::<String>().unwrap_err();
        assert_eq!(msg.downcast::<u32>().unwrap(), 42);
    }
}
