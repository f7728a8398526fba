use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::PhotoSource;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    Camera,
    Gallery,
}

impl From<PhotoSource> for Permission {
    fn from(source: PhotoSource) -> Self {
        match source {
            PhotoSource::Camera => Permission::Camera,
            PhotoSource::Gallery => Permission::Gallery,
        }
    }
}

/// Platform access checks for the capture surface. Implemented by the host
/// shell; requests may prompt the user and can be cancelled by dropping the
/// future.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn is_granted(&self, permission: Permission) -> bool;
    async fn request(&self, permission: Permission) -> bool;

    /// Checks first and only prompts when access is not yet granted.
    async fn ensure(&self, permission: Permission) -> bool {
        self.is_granted(permission).await || self.request(permission).await
    }
}

/// Fixed answers, for hosts where access is decided up front (desktop builds,
/// tests).
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub camera: bool,
    pub gallery: bool,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            camera: true,
            gallery: true,
        }
    }
}

#[async_trait]
impl PermissionGate for StaticPermissions {
    async fn is_granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::Camera => self.camera,
            Permission::Gallery => self.gallery,
        }
    }

    async fn request(&self, permission: Permission) -> bool {
        self.is_granted(permission).await
    }
}
