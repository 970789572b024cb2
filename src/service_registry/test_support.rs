//! Scratch directories for adapter unit tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use uuid::Uuid;

/// Uniquely named directory under the system temp dir, removed on drop.
pub(crate) struct ScratchDir {
    parent: Dir,
    name: String,
    path: Utf8PathBuf,
}

impl ScratchDir {
    pub(crate) fn new(prefix: &str) -> Self {
        let base = Utf8PathBuf::from_path_buf(std::env::temp_dir()).expect("utf-8 temp dir");
        let parent = Dir::open_ambient_dir(&base, ambient_authority()).expect("open temp dir");
        let name = format!("devhub-{prefix}-{}", Uuid::new_v4());
        parent.create_dir(&name).expect("create scratch dir");
        let path = base.join(&name);
        Self { parent, name, path }
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(crate) fn open(&self) -> Dir {
        self.parent.open_dir(&self.name).expect("open scratch dir")
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        drop(self.parent.remove_dir_all(&self.name));
    }
}
