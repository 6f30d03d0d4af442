use vergen::EmitBuilder;

fn main() {
    // Errors fall back to vergen's default values so builds outside a git
    // checkout still succeed.
    EmitBuilder::builder()
        .git_describe(true, true, None)
        .emit()
        .expect("vergen failed to emit build metadata");
}
