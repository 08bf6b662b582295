// Platform-specific device bridge
//
// This module handles camera capture, the permission dialog, the delete
// confirmation dialog and the share sheet. On Android, it uses JNI to call
// MainActivity methods and polls the activity's static result slots. On other
// platforms, it returns platform errors or a desktop default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum DeviceError {
    PermissionDenied(String),
    Timeout(String),
    Cancelled(String),
    PlatformNotSupported(String),
    Bridge(String),
    Other(String),
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            DeviceError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            DeviceError::Cancelled(msg) => write!(f, "Cancelled: {}", msg),
            DeviceError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
            DeviceError::Bridge(msg) => write!(f, "Bridge error: {}", msg),
            DeviceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

/// Combined camera + media library permission as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    /// Decode the activity's integer encoding (0 unknown, 1 granted, 2 denied)
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PermissionState::Granted,
            2 => PermissionState::Denied,
            _ => PermissionState::Unknown,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

/// Configuration for the device bridge on Android
///
/// This allows customization of the MainActivity class name for different apps.
#[derive(Debug, Clone)]
pub struct AndroidBridgeConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
}

impl Default for AndroidBridgeConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
        }
    }
}

#[cfg(target_os = "android")]
use jni::objects::{JClass, JObject, JString, JValue};

#[cfg(target_os = "android")]
use ndk_context::android_context;

#[cfg(target_os = "android")]
use std::time::{Duration, Instant};

#[cfg(target_os = "android")]
const POLL_INTERVAL: Duration = Duration::from_millis(100);
#[cfg(target_os = "android")]
const CAMERA_TIMEOUT: Duration = Duration::from_secs(60);
#[cfg(target_os = "android")]
const DIALOG_TIMEOUT: Duration = Duration::from_secs(30);
#[cfg(target_os = "android")]
const SHARE_TIMEOUT: Duration = Duration::from_secs(300);

#[cfg(target_os = "android")]
fn bridge_err(what: &str) -> impl Fn(jni::errors::Error) -> DeviceError + '_ {
    move |e| DeviceError::Bridge(format!("{} failed: {}", what, e))
}

#[cfg(target_os = "android")]
fn get_app_class_loader<'a>(env: &mut jni::JNIEnv<'a>) -> Result<JObject<'a>, DeviceError> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(bridge_err("find ActivityThread"))?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .and_then(|v| v.l())
        .map_err(bridge_err("currentActivityThread"))?;

    // Prefer application class loader
    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .and_then(|v| v.l())
        .map_err(bridge_err("getApplication"))?;

    let owner = if app.is_null() {
        // Fallback: system context
        env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
            .and_then(|v| v.l())
            .map_err(bridge_err("getSystemContext"))?
    } else {
        app
    };

    env.call_method(&owner, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(bridge_err("getClassLoader"))
}

#[cfg(target_os = "android")]
fn load_class<'a>(
    env: &mut jni::JNIEnv<'a>,
    loader: &JObject<'a>,
    fq_slash: &str,
) -> Result<JClass<'a>, DeviceError> {
    // ClassLoader.loadClass wants the dotted name
    let name: JString = env
        .new_string(fq_slash.replace('/', "."))
        .map_err(bridge_err("new_string"))?;
    let cls_obj = env
        .call_method(
            loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&JObject::from(name))],
        )
        .and_then(|v| v.l())
        .map_err(bridge_err("ClassLoader.loadClass"))?;
    Ok(JClass::from(cls_obj))
}

#[cfg(target_os = "android")]
fn companion_instance<'a>(
    env: &mut jni::JNIEnv<'a>,
    cls: &JClass<'a>,
    config: &AndroidBridgeConfig,
    signature: &str,
) -> Result<JObject<'a>, DeviceError> {
    let comp_signature = format!("L{}$Companion;", config.main_activity_class);
    let comp_obj = env
        .get_static_field(cls, "Companion", &comp_signature)
        .and_then(|v| v.l())
        .map_err(bridge_err("MainActivity.Companion"))?;

    if comp_obj.is_null() {
        return Err(DeviceError::Bridge(
            "MainActivity.Companion is null, activity not initialized?".to_string(),
        ));
    }

    env.call_method(&comp_obj, "getInstance", signature, &[])
        .and_then(|v| v.l())
        .map_err(bridge_err("Companion.getInstance()"))
}

#[cfg(target_os = "android")]
fn get_activity_instance<'a>(
    env: &mut jni::JNIEnv<'a>,
    config: &AndroidBridgeConfig,
) -> Result<(JObject<'a>, JClass<'a>), DeviceError> {
    let loader = get_app_class_loader(env)?;
    let cls = load_class(env, &loader, &config.main_activity_class)?;

    let signature = format!("()L{};", config.main_activity_class);

    // `@JvmStatic getInstance()`, then the `instance` field, then the Companion
    let instance = match env.call_static_method(&cls, "getInstance", &signature, &[]) {
        Ok(val) => val.l().map_err(bridge_err("getInstance()"))?,
        Err(_) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            let field = env
                .get_static_field(&cls, "instance", &signature)
                .and_then(|v| v.l());
            match field {
                Ok(inst) if !inst.is_null() => inst,
                _ => {
                    if env.exception_check().unwrap_or(false) {
                        let _ = env.exception_clear();
                    }
                    companion_instance(env, &cls, config, &signature)?
                }
            }
        }
    };

    if instance.is_null() {
        return Err(DeviceError::Bridge(
            "MainActivity instance is null - Activity not initialized?".to_string(),
        ));
    }

    Ok((instance, cls))
}

/// Attach to the VM, resolve the activity and run `f` against it
#[cfg(target_os = "android")]
fn with_activity<T>(
    config: &AndroidBridgeConfig,
    f: impl for<'a> FnOnce(&mut jni::JNIEnv<'a>, &JObject<'a>, &JClass<'a>) -> Result<T, DeviceError>,
) -> Result<T, DeviceError> {
    let vm_ptr = android_context().vm() as *mut jni::sys::JavaVM;
    let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(bridge_err("JavaVM"))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(bridge_err("JNI attach"))?;

    let (activity, cls) = get_activity_instance(&mut env, config)?;
    f(&mut env, &activity, &cls)
}

#[cfg(target_os = "android")]
fn static_string<'a>(
    env: &mut jni::JNIEnv<'a>,
    cls: &JClass<'a>,
    getter: &str,
) -> Result<Option<String>, DeviceError> {
    let obj = match env
        .call_static_method(cls, getter, "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
    {
        Ok(obj) if !obj.is_null() => obj,
        _ => return Ok(None),
    };
    let value: String = env
        .get_string((&obj).into())
        .map_err(bridge_err("String conversion"))?
        .into();
    Ok(Some(value))
}

#[cfg(target_os = "android")]
fn static_int<'a>(env: &mut jni::JNIEnv<'a>, cls: &JClass<'a>, getter: &str) -> Option<i32> {
    env.call_static_method(cls, getter, "()I", &[])
        .and_then(|v| v.i())
        .ok()
}

/// Poll until `check` yields a value, the activity reports an error, or `timeout` elapses
#[cfg(target_os = "android")]
fn poll_result<'a, T>(
    env: &mut jni::JNIEnv<'a>,
    cls: &JClass<'a>,
    timeout: Duration,
    what: &str,
    mut check: impl FnMut(&mut jni::JNIEnv<'a>, &JClass<'a>) -> Result<Option<T>, DeviceError>,
) -> Result<T, DeviceError> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        std::thread::sleep(POLL_INTERVAL);

        if let Some(value) = check(env, cls)? {
            return Ok(value);
        }
        if let Some(err) = static_string(env, cls, "getLastError")? {
            log::warn!("{}: activity reported '{}'", what, err);
            return Err(if err.contains("cancel") {
                DeviceError::Cancelled(err)
            } else {
                DeviceError::Other(err)
            });
        }
    }

    Err(DeviceError::Timeout(format!("{} - no result", what)))
}

#[cfg(target_os = "android")]
fn clear_last_result<'a>(env: &mut jni::JNIEnv<'a>, cls: &JClass<'a>) -> Result<(), DeviceError> {
    env.call_static_method(cls, "clearLastResult", "()V", &[])
        .map_err(bridge_err("clearLastResult"))?;
    Ok(())
}

/// Current combined camera + media permission
#[cfg(target_os = "android")]
pub fn permission_state(config: &AndroidBridgeConfig) -> Result<PermissionState, DeviceError> {
    with_activity(config, |env, activity, _cls| {
        env.call_method(activity, "getPermissionState", "()I", &[])
            .and_then(|v| v.i())
            .map(PermissionState::from_code)
            .map_err(bridge_err("getPermissionState"))
    })
}

/// Ask the OS for camera + media permission and wait for the dialog result
#[cfg(target_os = "android")]
pub fn request_permissions(config: &AndroidBridgeConfig) -> Result<PermissionState, DeviceError> {
    with_activity(config, |env, activity, cls| {
        clear_last_result(env, cls)?;
        env.call_method(activity, "requestCameraAndMediaPermissions", "()V", &[])
            .map_err(bridge_err("requestCameraAndMediaPermissions"))?;

        poll_result(env, cls, DIALOG_TIMEOUT, "Permission request", |env, cls| {
            Ok(match static_int(env, cls, "getLastPermissionResult") {
                Some(code) if code >= 0 => Some(PermissionState::from_code(code)),
                _ => None,
            })
        })
    })
}

/// Whether the device has a usable camera
#[cfg(target_os = "android")]
pub fn has_camera(config: &AndroidBridgeConfig) -> Result<bool, DeviceError> {
    with_activity(config, |env, activity, _cls| {
        env.call_method(activity, "hasCameraHardware", "()Z", &[])
            .and_then(|v| v.z())
            .map_err(bridge_err("hasCameraHardware"))
    })
}

/// Capture a photo using the camera
///
/// On Android, this launches the camera and waits for the user to take a photo.
/// Timeout is 60 seconds. Returns the absolute path to the temporary image.
#[cfg(target_os = "android")]
pub fn capture_photo(config: &AndroidBridgeConfig, facing: Facing) -> Result<PathBuf, DeviceError> {
    with_activity(config, |env, activity, cls| {
        clear_last_result(env, cls)?;
        let front = matches!(facing, Facing::Front);
        env.call_method(activity, "launchCamera", "(Z)V", &[JValue::Bool(front as u8)])
            .map_err(bridge_err("launchCamera"))?;

        poll_result(env, cls, CAMERA_TIMEOUT, "Camera", |env, cls| {
            Ok(static_string(env, cls, "getLastPhotoPath")?.map(PathBuf::from))
        })
    })
}

/// Show the delete confirmation dialog; `true` when the user confirmed
#[cfg(target_os = "android")]
pub fn confirm_delete(config: &AndroidBridgeConfig, count: usize) -> Result<bool, DeviceError> {
    with_activity(config, |env, activity, cls| {
        clear_last_result(env, cls)?;
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        env.call_method(
            activity,
            "launchDeleteConfirmation",
            "(I)V",
            &[JValue::Int(count)],
        )
        .map_err(bridge_err("launchDeleteConfirmation"))?;

        poll_result(env, cls, DIALOG_TIMEOUT, "Delete confirmation", |env, cls| {
            Ok(match static_int(env, cls, "getLastConfirmation") {
                Some(code) if code >= 0 => Some(code == 1),
                _ => None,
            })
        })
    })
}

/// Whether a share target is available
#[cfg(target_os = "android")]
pub fn is_share_available(config: &AndroidBridgeConfig) -> Result<bool, DeviceError> {
    with_activity(config, |env, activity, _cls| {
        env.call_method(activity, "canShare", "()Z", &[])
            .and_then(|v| v.z())
            .map_err(bridge_err("canShare"))
    })
}

/// Present the share sheet for one file and wait until it is dismissed.
/// Whether the user actually shared is not reported.
#[cfg(target_os = "android")]
pub fn share_file(config: &AndroidBridgeConfig, path: &str) -> Result<(), DeviceError> {
    with_activity(config, |env, activity, cls| {
        clear_last_result(env, cls)?;
        let jpath = env.new_string(path).map_err(bridge_err("new_string"))?;
        env.call_method(
            activity,
            "launchShare",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&JObject::from(jpath))],
        )
        .map_err(bridge_err("launchShare"))?;

        poll_result(env, cls, SHARE_TIMEOUT, "Share sheet", |env, cls| {
            let dismissed = env
                .call_static_method(cls, "isShareDismissed", "()Z", &[])
                .and_then(|v| v.z())
                .unwrap_or(false);
            Ok(dismissed.then_some(()))
        })
    })
}

// Non-Android implementations. Desktop has no OS permission gate, no camera
// bridge and no share sheet.
#[cfg(not(target_os = "android"))]
pub fn permission_state(_config: &AndroidBridgeConfig) -> Result<PermissionState, DeviceError> {
    Ok(PermissionState::Granted)
}

#[cfg(not(target_os = "android"))]
pub fn request_permissions(_config: &AndroidBridgeConfig) -> Result<PermissionState, DeviceError> {
    Ok(PermissionState::Granted)
}

#[cfg(not(target_os = "android"))]
pub fn has_camera(_config: &AndroidBridgeConfig) -> Result<bool, DeviceError> {
    Err(DeviceError::PlatformNotSupported(
        "Camera not available on this platform".to_string(),
    ))
}

#[cfg(not(target_os = "android"))]
pub fn capture_photo(
    _config: &AndroidBridgeConfig,
    _facing: Facing,
) -> Result<PathBuf, DeviceError> {
    Err(DeviceError::PlatformNotSupported(
        "Camera not available on this platform".to_string(),
    ))
}

#[cfg(not(target_os = "android"))]
pub fn confirm_delete(_config: &AndroidBridgeConfig, _count: usize) -> Result<bool, DeviceError> {
    Ok(true)
}

#[cfg(not(target_os = "android"))]
pub fn is_share_available(_config: &AndroidBridgeConfig) -> Result<bool, DeviceError> {
    Ok(false)
}

#[cfg(not(target_os = "android"))]
pub fn share_file(_config: &AndroidBridgeConfig, _path: &str) -> Result<(), DeviceError> {
    Err(DeviceError::PlatformNotSupported(
        "Sharing not available on this platform".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_codes() {
        assert_eq!(PermissionState::from_code(0), PermissionState::Unknown);
        assert_eq!(PermissionState::from_code(1), PermissionState::Granted);
        assert_eq!(PermissionState::from_code(2), PermissionState::Denied);
        assert_eq!(PermissionState::from_code(-1), PermissionState::Unknown);
    }

    #[test]
    fn test_facing_flip() {
        assert_eq!(Facing::Back.flipped(), Facing::Front);
        assert_eq!(Facing::Front.flipped().flipped(), Facing::Front);
        assert_eq!(Facing::default(), Facing::Back);
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_desktop_defaults() {
        let config = AndroidBridgeConfig::default();
        assert_eq!(
            request_permissions(&config).unwrap(),
            PermissionState::Granted
        );
        assert!(has_camera(&config).is_err());
        assert!(!is_share_available(&config).unwrap());
        assert!(confirm_delete(&config, 3).unwrap());
    }
}
