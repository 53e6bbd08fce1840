// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for nebo-app-sdk
//!
//! Compiles the Nebo app capability contract (`proto/nebo/apps/v1/apps.proto`)
//! into tonic servers and clients. Generated code is placed in `OUT_DIR` and
//! included via `tonic::include_proto!` in `src/presentation/grpc/mod.rs`.
//!
//! # Dependencies
//!
//! - **protoc**: Protocol buffer compiler (vendored via `protoc-bin-vendored`)
//! - **tonic-prost-build**: Code generator for Rust gRPC stubs

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?;
    std::env::set_var("PROTOC", protoc);

    // Clients are generated for the host side and the integration tests. The
    // transport `connect` constructor is skipped because the contract has its
    // own `Connect` rpcs; clients are built with `Client::new(channel)`.
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .build_transport(false)
        .compile_protos(&["proto/nebo/apps/v1/apps.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/nebo/apps/v1/apps.proto");

    Ok(())
}
