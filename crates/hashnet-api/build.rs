fn main() {
    // Compile the consensus node gRPC schema
    tonic_prost_build::configure()
        .out_dir("src/")
        .compile_protos(&["proto/hashnet.proto"], &["proto"])
        .unwrap();
}
