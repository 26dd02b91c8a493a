fn main() {
    // src/config.rs reads DUALCORE_SCHED_LOG with option_env!.
    println!("cargo:rerun-if-env-changed=DUALCORE_SCHED_LOG");
}
