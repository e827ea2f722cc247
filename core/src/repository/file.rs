use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::model::{Collection, Namespace};
use crate::repository::traits::RecordStore;

const DEFAULT_DIR_NAME: &str = ".parklog";

/// One pretty-printed JSON array per namespace under a data directory.
#[derive(Clone, Debug)]
pub struct FileRecordStore {
    base_dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => Self::default_dir()?,
        };
        fs::create_dir_all(&path)?;
        info!("Opening record store at {}", path.display());
        Ok(FileRecordStore { base_dir: path })
    }

    /// `~/.parklog`
    pub fn default_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(home_dir.join(DEFAULT_DIR_NAME))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, namespace: Namespace) -> PathBuf {
        self.base_dir.join(format!("{}.json", namespace))
    }

    fn staging_path_for(&self, namespace: Namespace) -> PathBuf {
        self.base_dir.join(format!("{}.json.tmp", namespace))
    }

    /// Writes the collection next to its target. The target itself is untouched.
    fn stage<T: Collection>(&self, records: &[T]) -> Result<PathBuf> {
        let tmp = self.staging_path_for(T::NAMESPACE);
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(tmp)
    }

    fn publish(&self, staged: &Path, namespace: Namespace) -> Result<()> {
        fs::rename(staged, self.path_for(namespace))?;
        Ok(())
    }

    /// Renames staged files in order. Stops at the first failure.
    fn publish_all(&self, staged: &[(PathBuf, Namespace)]) -> Result<()> {
        for (i, (path, namespace)) in staged.iter().enumerate() {
            if let Err(e) = self.publish(path, *namespace) {
                if i > 0 {
                    // Only window where a commit can diverge: earlier files replaced, the rest still staged.
                    let done: Vec<&str> = staged[..i].iter().map(|(_, ns)| ns.as_str()).collect();
                    error!(
                        "{} updated but {} was not; staged copy left at {}",
                        done.join(" + "),
                        namespace,
                        path.display()
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn discard(&self, staged: &[PathBuf]) {
        for path in staged {
            if let Err(e) = fs::remove_file(path) {
                warn!("could not remove staged file {}: {}", path.display(), e);
            }
        }
    }
}

impl RecordStore for FileRecordStore {
    fn read_all<T: Collection>(&self) -> Result<Vec<T>> {
        let path = self.path_for(T::NAMESPACE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let records: Vec<T> = serde_json::from_reader(reader)?;
        debug!("read {} records from {}", records.len(), T::NAMESPACE);
        Ok(records)
    }

    fn write_all<T: Collection>(&self, records: &[T]) -> Result<()> {
        let staged = self.stage(records)?;
        self.publish(&staged, T::NAMESPACE)?;
        debug!("wrote {} records to {}", records.len(), T::NAMESPACE);
        Ok(())
    }

    fn write_pair<A: Collection, B: Collection>(&self, first: &[A], second: &[B]) -> Result<()> {
        let staged_first = self.stage(first)?;
        let staged_second = match self.stage(second) {
            Ok(path) => path,
            Err(e) => {
                self.discard(&[staged_first]);
                return Err(e);
            }
        };

        self.publish_all(&[(staged_first, A::NAMESPACE), (staged_second, B::NAMESPACE)])?;
        debug!("wrote {} + {} as one commit", A::NAMESPACE, B::NAMESPACE);
        Ok(())
    }

    fn write_triple<A: Collection, B: Collection, C: Collection>(
        &self,
        first: &[A],
        second: &[B],
        third: &[C],
    ) -> Result<()> {
        let staged_first = self.stage(first)?;
        let staged_second = match self.stage(second) {
            Ok(path) => path,
            Err(e) => {
                self.discard(&[staged_first]);
                return Err(e);
            }
        };
        let staged_third = match self.stage(third) {
            Ok(path) => path,
            Err(e) => {
                self.discard(&[staged_first, staged_second]);
                return Err(e);
            }
        };

        self.publish_all(&[
            (staged_first, A::NAMESPACE),
            (staged_second, B::NAMESPACE),
            (staged_third, C::NAMESPACE),
        ])?;
        debug!("wrote {} + {} + {} as one commit", A::NAMESPACE, B::NAMESPACE, C::NAMESPACE);
        Ok(())
    }
}
