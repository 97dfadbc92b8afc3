// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async NTP client using the smol runtime.
//!
//! Same contract as [`async_ntp`](crate::async_ntp) but built on [`smol::net::UdpSocket`],
//! with [`futures_lite::future::or`] racing the exchange against a [`smol::Timer`].
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), ntpsync_client::error::NtpError> {
//! let instant = ntpsync_client::smol_ntp::get_network_time("time.windows.com").await?;
//! println!("Network time: {}", instant.to_local());
//! # Ok(())
//! # }
//! ```

use log::debug;
use smol::net::UdpSocket;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{NtpError, TimeoutError};
use crate::request::{
    DEFAULT_TIMEOUT, NtpTransport, RECV_BUF_SIZE, bind_addr_for, decode_response, is_reply_source,
    is_unreachable, select_target,
};
use ntpsync_proto::UtcInstant;
use ntpsync_proto::protocol::{self, Reply};

/// Fetch the time from `server` with the default 3 second timeout.
pub async fn get_network_time(server: &str) -> Result<UtcInstant, NtpError> {
    fetch_time(server, DEFAULT_TIMEOUT).await
}

/// Fetch the time from `server` on port 123, waiting at most `timeout` for the reply.
pub async fn fetch_time(server: &str, timeout: Duration) -> Result<UtcInstant, NtpError> {
    let transport = NtpTransport::new().with_timeout(timeout);
    fetch_reply(&transport, server).await.map(|reply| reply.instant())
}

/// Resolve `server` with the settings of `transport`, exchange one packet pair, and return
/// the decoded reply.
pub async fn fetch_reply(transport: &NtpTransport, server: &str) -> Result<Reply, NtpError> {
    let resolved = smol::net::resolve((server, transport.port())).await;
    let target = select_target(server, resolved, transport.address_policy())?;

    let timeout = transport.timeout();
    if timeout.is_zero() {
        return Err(TimeoutError::Recv(timeout).into());
    }
    futures_lite::future::or(exchange(target), async {
        smol::Timer::after(timeout).await;
        Err(NtpError::Timeout(TimeoutError::Recv(timeout)))
    })
    .await
}

/// Inner exchange without timeout wrapping.
///
/// Datagrams from other sources and ICMP unreachable reports are skipped; the caller's
/// timeout ends the wait.
async fn exchange(target: SocketAddr) -> Result<Reply, NtpError> {
    let sock = UdpSocket::bind(bind_addr_for(&target)).await?;

    let sz = sock.send_to(&protocol::build_request(), target).await?;
    debug!("{:?}", sock.local_addr());
    debug!("sent: {}", sz);

    let mut recv_buf = [0u8; RECV_BUF_SIZE];
    loop {
        match sock.recv_from(&mut recv_buf[..]).await {
            Ok((recv_len, src_addr)) if is_reply_source(src_addr, target) => {
                debug!("recv: {} bytes from {}", recv_len, src_addr);
                return decode_response(&recv_buf[..recv_len]);
            }
            Ok((recv_len, src_addr)) => {
                debug!("ignored {} bytes from unexpected source {}", recv_len, src_addr);
            }
            Err(e) if is_unreachable(&e) => debug!("ignored ICMP error: {}", e),
            Err(e) => return Err(e.into()),
        }
    }
}
