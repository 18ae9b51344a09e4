/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use serde::Serialize;

/// Attempt counters for one refresh cycle. A retried URL counts once per attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GetState {
    attempts: u64,
    successful_attempts: u64,
    failed_attempts: u64,
    exhausted_urls: u64,
}

impl GetState {
    pub fn new() -> GetState {
        GetState::default()
    }

    pub fn add_success(&mut self) {
        self.attempts += 1;
        self.successful_attempts += 1;
    }

    pub fn add_failure(&mut self) {
        self.attempts += 1;
        self.failed_attempts += 1;
    }

    pub fn add_exhausted(&mut self) {
        self.exhausted_urls += 1;
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn successful_attempts(&self) -> u64 {
        self.successful_attempts
    }

    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts
    }

    pub fn exhausted_urls(&self) -> u64 {
        self.exhausted_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut state = GetState::new();
        state.add_failure();
        state.add_failure();
        state.add_success();
        state.add_exhausted();

        assert_eq!(state.attempts(), 3);
        assert_eq!(state.successful_attempts(), 1);
        assert_eq!(state.failed_attempts(), 2);
        assert_eq!(state.exhausted_urls(), 1);
    }
}
