// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "smol-runtime")]

mod common;

use std::time::{Duration, Instant};

use common::{
    Behavior, Responder, TIMER_SLACK, closed_port, is_network_skip_error, network_tests_disabled,
};
use ntpsync_client::NtpTransport;
use ntpsync_client::smol_ntp;
use ntpsync_client::error::ErrorKind;

#[test]
fn test_smol_fetch_from_loopback() {
    smol::block_on(async {
        let responder = Responder::spawn(Behavior::Reply {
            seconds: 3_920_961_600,
            fraction: 0x4000_0000,
        });
        let transport = NtpTransport::new()
            .with_port(responder.addr.port())
            .with_timeout(Duration::from_secs(5));

        let reply = smol_ntp::fetch_reply(&transport, "127.0.0.1").await.unwrap();
        assert_eq!(reply.instant().unix_millis(), 1_711_972_800_250);
        assert_eq!(
            responder.request().unwrap(),
            ntpsync_client::protocol::build_request().to_vec()
        );
    });
}

#[test]
fn test_smol_short_reply() {
    smol::block_on(async {
        let responder = Responder::spawn(Behavior::Short(47));
        let transport = NtpTransport::new()
            .with_port(responder.addr.port())
            .with_timeout(Duration::from_secs(5));

        let err = smol_ntp::fetch_reply(&transport, "127.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedReply);
    });
}

#[test]
fn test_smol_timeout() {
    smol::block_on(async {
        let timeout = Duration::from_millis(300);
        let responder = Responder::spawn(Behavior::Silent(Duration::from_secs(2)));
        let transport = NtpTransport::new()
            .with_port(responder.addr.port())
            .with_timeout(timeout);

        let start = Instant::now();
        let err = smol_ntp::fetch_reply(&transport, "127.0.0.1")
            .await
            .unwrap_err();
        let elapsed = start.elapsed();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(elapsed + TIMER_SLACK >= timeout, "returned after {elapsed:?}");
        assert!(elapsed < timeout + Duration::from_secs(2));
    });
}

#[test]
fn test_smol_closed_port_times_out() {
    smol::block_on(async {
        let timeout = Duration::from_millis(500);
        let transport = NtpTransport::new()
            .with_port(closed_port())
            .with_timeout(timeout);

        let err = smol_ntp::fetch_reply(&transport, "127.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout, "unexpected error: {err}");
    });
}

#[test]
fn test_smol_unresolvable_host() {
    smol::block_on(async {
        let err = smol_ntp::fetch_time("this-host-does-not-exist.invalid", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResolutionFailed);
    });
}

#[test]
fn test_smol_get_network_time_windows() {
    smol::block_on(async {
        if network_tests_disabled() {
            return;
        }
        match smol_ntp::get_network_time("time.windows.com").await {
            Ok(_) => {}
            Err(e) if is_network_skip_error(&e) => {
                eprintln!("skipping test_smol_get_network_time_windows: {e}");
            }
            Err(e) => panic!("unexpected error from time.windows.com: {e}"),
        }
    });
}
