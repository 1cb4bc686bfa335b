use std::fmt;
use std::path::{Path, PathBuf};

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors from building a shader program. Compiler and linker diagnostics
/// are carried verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source {path}: {source}")]
    SourceUnreadable {
        stage: StageKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} shader source is empty")]
    EmptySource(StageKind),
    #[error("{stage} shader compilation failed:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("shader program link failed:\n{log}")]
    Link { log: String },
}

/// GPU seam for shader compilation and linking.
///
/// `link` takes both stages by value: once a program is linked the stage
/// objects are released.
pub trait ShaderBackend {
    type Stage;
    type Program;

    fn compile(&mut self, kind: StageKind, source: &str) -> Result<Self::Stage, ShaderError>;

    fn link(
        &mut self,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, ShaderError>;
}

/// Builds a program from a vertex and a fragment source.
pub struct ShaderProgramBuilder<B> {
    backend: B,
}

impl<B: ShaderBackend> ShaderProgramBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn compile(&mut self, kind: StageKind, source: &str) -> Result<B::Stage, ShaderError> {
        self.backend.compile(kind, source)
    }

    pub fn link(&mut self, vertex: B::Stage, fragment: B::Stage) -> Result<B::Program, ShaderError> {
        self.backend.link(vertex, fragment)
    }

    /// Compile both stages and link them. Empty sources are rejected before
    /// the backend is touched.
    pub fn build(&mut self, vertex_source: &str, fragment_source: &str) -> Result<B::Program, ShaderError> {
        if vertex_source.is_empty() {
            return Err(ShaderError::EmptySource(StageKind::Vertex));
        }
        if fragment_source.is_empty() {
            return Err(ShaderError::EmptySource(StageKind::Fragment));
        }

        let vertex = self.compile(StageKind::Vertex, vertex_source)?;
        let fragment = self.compile(StageKind::Fragment, fragment_source)?;
        let program = self.link(vertex, fragment)?;
        tracing::debug!("shader program linked");
        Ok(program)
    }

    /// Read both sources from disk, then [`build`](Self::build).
    pub fn build_from_files(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<B::Program, ShaderError> {
        let vertex = read_source(StageKind::Vertex, vertex_path.as_ref())?;
        let fragment = read_source(StageKind::Fragment, fragment_path.as_ref())?;
        self.build(&vertex, &fragment)
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

fn read_source(stage: StageKind, path: &Path) -> Result<String, ShaderError> {
    let source = std::fs::read_to_string(path).map_err(|source| ShaderError::SourceUnreadable {
        stage,
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(%stage, path = %path.display(), bytes = source.len(), "read shader source");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call; compiles anything that doesn't contain "error".
    #[derive(Default)]
    struct RecordingBackend {
        compiled: Vec<StageKind>,
        linked: usize,
    }

    impl ShaderBackend for RecordingBackend {
        type Stage = StageKind;
        type Program = (StageKind, StageKind);

        fn compile(&mut self, kind: StageKind, source: &str) -> Result<StageKind, ShaderError> {
            self.compiled.push(kind);
            if source.contains("error") {
                return Err(ShaderError::Compile {
                    stage: kind,
                    log: format!("syntax error in {kind} stage"),
                });
            }
            Ok(kind)
        }

        fn link(&mut self, v: StageKind, f: StageKind) -> Result<(StageKind, StageKind), ShaderError> {
            self.linked += 1;
            Ok((v, f))
        }
    }

    #[test]
    fn empty_vertex_source_never_reaches_backend() {
        let mut builder = ShaderProgramBuilder::new(RecordingBackend::default());
        let err = builder.build("", "fs").unwrap_err();
        assert!(matches!(err, ShaderError::EmptySource(StageKind::Vertex)));
        assert!(builder.backend().compiled.is_empty());
        assert_eq!(builder.backend().linked, 0);
    }

    #[test]
    fn empty_fragment_source_never_reaches_backend() {
        let mut builder = ShaderProgramBuilder::new(RecordingBackend::default());
        let err = builder.build("vs", "").unwrap_err();
        assert!(matches!(err, ShaderError::EmptySource(StageKind::Fragment)));
        assert!(builder.backend().compiled.is_empty());
    }

    #[test]
    fn build_compiles_then_links() {
        let mut builder = ShaderProgramBuilder::new(RecordingBackend::default());
        let program = builder.build("vs", "fs").unwrap();
        assert_eq!(program, (StageKind::Vertex, StageKind::Fragment));
        assert_eq!(
            builder.backend().compiled,
            vec![StageKind::Vertex, StageKind::Fragment]
        );
        assert_eq!(builder.backend().linked, 1);
    }

    #[test]
    fn compile_failure_skips_link() {
        let mut builder = ShaderProgramBuilder::new(RecordingBackend::default());
        let err = builder.build("vs", "error").unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(log.contains("syntax error"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(builder.into_backend().linked, 0);
    }

    #[test]
    fn missing_file_is_unreadable_source() {
        let mut builder = ShaderProgramBuilder::new(RecordingBackend::default());
        let err = builder
            .build_from_files("/nonexistent/mesh.vert.wgsl", "/nonexistent/mesh.frag.wgsl")
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::SourceUnreadable {
                stage: StageKind::Vertex,
                ..
            }
        ));
        assert!(builder.backend().compiled.is_empty());
    }

    #[test]
    fn stage_kind_display() {
        assert_eq!(StageKind::Vertex.to_string(), "vertex");
        assert_eq!(StageKind::Fragment.to_string(), "fragment");
    }
}
