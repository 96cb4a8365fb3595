//! 比特流读取器.
//!
//! 按小端位序 (LSB first) 从字节缓冲区中读取变长位字段, 是 M10 语音解码器的基础设施.
//!
//! 读取器内部维护一个位累加器: 每次消耗位后, 若有效位数不足 8, 就把下一个字节左移
//! "当前有效位数" 后并入累加器. 因此在任意两次读取之间, 累加器中至少有 8 个有效位,
//! `peek_bits(8)` 总是合法的.
//!
//! 到达数据末尾时补零字节而不是报错: M10 的块边界并不总是对齐到最后一个真实字节,
//! 解码末尾块时会读到少量填充位.

/// 低 N 位掩码表
const BITMASK: [u32; 9] = [0, 0x01, 0x03, 0x07, 0x0F, 0x1F, 0x3F, 0x7F, 0xFF];

/// 小端位序比特流读取器
///
/// # 示例
/// ```
/// use bumpkin_core::bitreader::BitReader;
///
/// let data = [0b1011_0010, 0b0000_0001];
/// let mut br = BitReader::new(&data);
/// assert_eq!(br.read_bits(1), 0);
/// assert_eq!(br.read_bits(3), 0b001);
/// assert_eq!(br.read_bits(4), 0b1011);
/// assert_eq!(br.read_bits(8), 0b0000_0001);
/// // 数据耗尽后读到的是填充的零位
/// assert_eq!(br.read_bits(8), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// 源数据
    data: &'a [u8],
    /// 下一个待并入累加器的字节索引
    byte_pos: usize,
    /// 位累加器, 低位先出
    accumulator: u32,
    /// 累加器中的有效位数
    bit_count: u32,
    /// 到达末尾后已补入的零位总数
    padding_bits: u32,
}

impl<'a> BitReader<'a> {
    /// 创建读取器并预读第一个字节 (8 个有效位)
    pub fn new(data: &'a [u8]) -> Self {
        let mut br = Self {
            data,
            byte_pos: 0,
            accumulator: 0,
            bit_count: 0,
            padding_bits: 0,
        };
        br.accumulator = u32::from(br.next_byte());
        br.bit_count = 8;
        br
    }

    /// 取下一个源字节, 末尾之后返回 0
    fn next_byte(&mut self) -> u8 {
        match self.data.get(self.byte_pos) {
            Some(&b) => {
                self.byte_pos += 1;
                b
            }
            None => {
                self.padding_bits = self.padding_bits.saturating_add(8);
                0
            }
        }
    }

    /// 消耗 n 位并在有效位不足 8 时补充一个字节
    fn consume(&mut self, n: u32) {
        debug_assert!(n <= 8, "单次最多消耗 8 位, 实际 {n}");
        debug_assert!(n <= self.bit_count);
        self.bit_count -= n;
        self.accumulator >>= n;

        if self.bit_count < 8 {
            let refill = u32::from(self.next_byte()) << self.bit_count;
            self.accumulator |= refill;
            self.bit_count += 8;
        }
    }

    /// 读取 n 位 (1..=8), 低位先出
    pub fn read_bits(&mut self, n: u32) -> u32 {
        let value = self.peek_bits(n);
        self.consume(n);
        value
    }

    /// 读取 1 位并转换为布尔值
    pub fn read_flag(&mut self) -> bool {
        self.read_bits(1) != 0
    }

    /// 跳过 n 位 (1..=8)
    pub fn skip_bits(&mut self, n: u32) {
        self.consume(n);
    }

    /// 窥视 n 位 (不移动位置), n 最大为 8
    pub fn peek_bits(&self, n: u32) -> u32 {
        debug_assert!(n <= 8, "peek_bits: n={n} 超过 8 位");
        self.accumulator & BITMASK[n as usize]
    }

    /// 累加器中当前的有效位数 (含填充位)
    pub fn valid_bits(&self) -> u32 {
        self.bit_count
    }

    /// 已并入累加器的源字节数
    pub fn byte_position(&self) -> usize {
        self.byte_pos
    }

    /// 剩余的真实 (非填充) 位数
    pub fn bits_left(&self) -> usize {
        let in_acc = self.bit_count.saturating_sub(self.padding_bits) as usize;
        in_acc + (self.data.len() - self.byte_pos) * 8
    }

    /// 真实数据是否已全部消耗, 之后读到的都是填充零位
    pub fn is_exhausted(&self) -> bool {
        self.bits_left() == 0
    }

    /// 到达末尾后补入的零位总数
    pub fn padding_bits(&self) -> u32 {
        self.padding_bits
    }
}
