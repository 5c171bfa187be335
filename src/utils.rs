use directories::ProjectDirs;

/// Get directories for the project for config, cache, etc.
pub fn get_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ytresolve", "ytresolve")
}
