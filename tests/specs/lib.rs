// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![cfg(test)]

mod cli;
