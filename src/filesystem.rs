use std::path::PathBuf;

#[cfg(target_os = "android")]
const APP_PACKAGE: &str = "de.teilgedanken.snapgrid";

#[cfg(target_os = "android")]
fn android_files_dir() -> Option<PathBuf> {
    use jni::{objects::{JObject, JString}, JavaVM};
    unsafe {
        let ctx = ndk_context::android_context();
        let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
        let mut env = vm.attach_current_thread().ok()?; // mutable for JNI calls
        let activity = JObject::from_raw(ctx.context().cast());
        let files_dir = env
            .call_method(activity, "getFilesDir", "()Ljava/io/File;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_obj = env
            .call_method(files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_jstring: JString = JString::from(abs_path_obj);
        let abs_path: String = env.get_string(&abs_path_jstring).ok()?.into();
        Some(PathBuf::from(abs_path))
    }
}

/// Get the app data directory for the current platform
pub fn get_app_data_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        if let Some(dir) = android_files_dir() { return dir; }
        // Fallbacks
        for d in [
            format!("/data/user/0/{}/files", APP_PACKAGE),
            format!("/data/data/{}/files", APP_PACKAGE),
        ] {
            let p = PathBuf::from(d);
            if p.exists() { return p; }
        }
        PathBuf::from("./data")
    }

    #[cfg(not(target_os = "android"))]
    {
        // On desktop, use ./data directory
        PathBuf::from("./data")
    }
}

/// Location of `config.toml`
pub fn config_path() -> PathBuf {
    get_app_data_dir().join("config.toml")
}

/// Directory holding imported photos and their thumbnails
pub fn photo_storage_dir() -> PathBuf {
    get_app_data_dir().join("photos")
}
