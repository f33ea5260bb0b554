//! Uploaded file models

use serde::Deserialize;

/// File attached to a build
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    /// File ID
    #[serde(rename = "@file_id")]
    pub id: String,

    /// File name as stored by the service
    #[serde(rename = "@file_name", default)]
    pub name: String,

    /// Upload status (e.g. `Uploaded`)
    #[serde(rename = "@file_status", default)]
    pub status: Option<String>,
}

/// `<filelist>` response document. Lists every file in the build, not only
/// the one just uploaded.
#[derive(Debug, Clone, Deserialize)]
pub struct FileList {
    #[serde(rename = "file", default)]
    pub files: Vec<UploadedFile>,
}

impl FileList {
    /// The entry for `file_name`, or the last listed file when no name matches.
    pub fn into_uploaded(self, file_name: &str) -> Option<UploadedFile> {
        let mut files = self.files;
        match files.iter().position(|f| f.name == file_name) {
            Some(idx) => Some(files.swap_remove(idx)),
            None => files.pop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_LIST: &str = r#"<filelist filelist_version="1.1" app_id="2" sandbox_id="44" build_id="1234">
   <file file_id="1111" file_name="other.zip" file_status="Uploaded"/>
   <file file_id="2345" file_name="mysandbox.zip" file_status="Uploaded"/>
</filelist>"#;

    #[test]
    fn test_into_uploaded_matches_name() {
        let list: FileList = quick_xml::de::from_str(FILE_LIST).unwrap();
        let file = list.into_uploaded("mysandbox.zip").unwrap();
        assert_eq!(file.id, "2345");
        assert_eq!(file.status.as_deref(), Some("Uploaded"));
    }

    #[test]
    fn test_into_uploaded_falls_back_to_last() {
        let list: FileList = quick_xml::de::from_str(FILE_LIST).unwrap();
        assert_eq!(list.into_uploaded("missing.zip").unwrap().id, "2345");
    }

    #[test]
    fn test_into_uploaded_empty() {
        let list = FileList { files: Vec::new() };
        assert!(list.into_uploaded("x.zip").is_none());
    }
}
