// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
The `ntpsync` command: fetch the time from an NTP server, print it, and optionally set the
system clock.

```text
ntpsync [SERVER] [--set-clock] [--timeout-ms N] [--config PATH] [--ipv6]
```

The protocol codec lives in `ntpsync-proto` and the network query and clock setter in
`ntpsync-client`; this crate only merges settings and reports the result.
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
