//! 进程内缓存适配器，用于开发环境与测试。

pub mod mem;
