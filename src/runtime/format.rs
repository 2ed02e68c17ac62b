//! printf 风格的位置参数格式化
//!
//! 占位符语法：`%[flags][width][.precision][[n]]verb`
//!
//! - flags：`-` 左对齐，`0` 补零，`+` 总是带符号，空格为正数留出符号位，
//!   `#` 为 `x`/`X`/`o`/`b` 加前缀
//! - `%%` 输出 `%`
//! - `%s` `%v` 输出参数原文，精度截断字符数；`%q` 输出带引号转义的参数
//! - `%d` `%b` `%o` `%O` `%x` `%X` `%c` `%U` 把参数当作整数，
//!   `%e` `%E` `%f` `%F` `%g` `%G` 把参数当作浮点数；解析失败时输出参数原文
//! - `%[n]d` 显式指定第 n 个参数（从 1 开始），之后的隐式动词从 n+1 继续
//!
//! 参数缺失、索引越界、多余参数都不会报错，而是在结果中留下
//! `%!d(MISSING)`、`%!d(BADINDEX)`、`%!(EXTRA ...)` 标记；
//! 模板末尾孤立的 `%` 输出 `%!(NOVERB)`。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)%([-+# 0]*)(\d+)?(?:\.(\d*))?(?:\[([^\]]*)\])?(.)?").expect("verb pattern")
});

/// 按模板渲染参数
pub fn sprintf<S: AsRef<str>>(
    template: &str,
    args: &[S],
) -> String {
    let mut next = 0usize;
    let mut reordered = false;

    let rendered = VERB.replace_all(template, |caps: &Captures<'_>| {
        let Some(verb) = caps.get(5).and_then(|m| m.as_str().chars().next()) else {
            return "%!(NOVERB)".to_string();
        };
        if verb == '%' {
            return "%".to_string();
        }

        let index = match caps.get(4) {
            Some(explicit) => {
                reordered = true;
                match explicit.as_str().parse::<usize>() {
                    Ok(n) if n >= 1 && n <= args.len() => n - 1,
                    _ => return format!("%!{verb}(BADINDEX)"),
                }
            }
            None => next,
        };

        match args.get(index) {
            Some(arg) => {
                next = index + 1;
                Directive::from_captures(caps, verb).render(arg.as_ref())
            }
            None => format!("%!{verb}(MISSING)"),
        }
    });

    let mut out = rendered.into_owned();
    if !reordered && next < args.len() {
        let extra: Vec<&str> = args[next..].iter().map(|a| a.as_ref()).collect();
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

/// 单个占位符
#[derive(Debug, Clone, Copy)]
struct Directive<'t> {
    flags: &'t str,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

impl<'t> Directive<'t> {
    fn from_captures(
        caps: &Captures<'t>,
        verb: char,
    ) -> Self {
        Self {
            flags: caps.get(1).map_or("", |m| m.as_str()),
            width: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            // `%.f` 等价于精度 0
            precision: caps.get(3).map(|m| m.as_str().parse().unwrap_or(0)),
            verb,
        }
    }

    fn has(
        &self,
        flag: char,
    ) -> bool {
        self.flags.contains(flag)
    }

    fn render(
        &self,
        arg: &str,
    ) -> String {
        match self.verb {
            'd' | 'b' | 'o' | 'O' | 'x' | 'X' | 'c' | 'U' => {
                if let Ok(n) = arg.trim().parse::<i128>() {
                    return self.integer(n);
                }
            }
            'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                if let Ok(v) = arg.trim().parse::<f64>() {
                    return self.float(v);
                }
            }
            _ => {}
        }

        let text = match self.verb {
            's' | 'v' => self.truncate(arg).to_string(),
            'q' => format!("{:?}", self.truncate(arg)),
            'x' | 'X' => self.hex_bytes(arg),
            c if c.is_alphabetic() => arg.to_string(),
            c => return format!("%!{c}({arg})"),
        };
        self.pad(text, self.has('0'))
    }

    fn truncate<'a>(
        &self,
        arg: &'a str,
    ) -> &'a str {
        match self.precision.and_then(|p| arg.char_indices().nth(p)) {
            Some((end, _)) => &arg[..end],
            None => arg,
        }
    }

    fn integer(
        &self,
        n: i128,
    ) -> String {
        let abs = n.unsigned_abs();
        match self.verb {
            'c' => {
                let c = u32::try_from(abs).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}');
                return self.pad(c.to_string(), false);
            }
            'U' => return self.pad(format!("U+{:04X}", abs), false),
            _ => {}
        }

        let mut digits = match self.verb {
            'b' => format!("{:b}", abs),
            'o' | 'O' => format!("{:o}", abs),
            'x' => format!("{:x}", abs),
            'X' => format!("{:X}", abs),
            _ => abs.to_string(),
        };
        if let Some(p) = self.precision {
            if digits.len() < p {
                digits.insert_str(0, &"0".repeat(p - digits.len()));
            }
        }
        let prefix = match (self.verb, self.has('#')) {
            ('b', true) => "0b",
            ('o', true) => "0",
            ('O', _) => "0o",
            ('x', true) => "0x",
            ('X', true) => "0X",
            _ => "",
        };
        // 整数指定精度时忽略 `0`
        self.number(n < 0, prefix, digits, self.precision.is_none())
    }

    fn float(
        &self,
        v: f64,
    ) -> String {
        if v.is_nan() {
            return self.pad("NaN".to_string(), false);
        }
        if v.is_infinite() {
            let text = if v < 0.0 { "-Inf" } else { "+Inf" };
            return self.pad(text.to_string(), false);
        }

        let abs = v.abs();
        let upper = self.verb.is_ascii_uppercase();
        let digits = match self.verb {
            'e' | 'E' => scientific(abs, self.precision.unwrap_or(6), upper),
            'f' | 'F' => format!("{:.*}", self.precision.unwrap_or(6), abs),
            _ => general(abs, self.precision, upper),
        };
        self.number(v.is_sign_negative(), "", digits, true)
    }

    /// 符号、前缀、补零
    fn number(
        &self,
        negative: bool,
        prefix: &str,
        mut digits: String,
        zero_allowed: bool,
    ) -> String {
        let sign = if negative {
            "-"
        } else if self.has('+') {
            "+"
        } else if self.has(' ') {
            " "
        } else {
            ""
        };

        if zero_allowed && self.has('0') && !self.has('-') {
            if let Some(width) = self.width {
                let used = sign.len() + prefix.len() + digits.chars().count();
                if used < width {
                    digits.insert_str(0, &"0".repeat(width - used));
                }
            }
        }
        self.pad(format!("{sign}{prefix}{digits}"), false)
    }

    fn hex_bytes(
        &self,
        arg: &str,
    ) -> String {
        let bytes = match self.precision {
            Some(p) => &arg.as_bytes()[..p.min(arg.len())],
            None => arg.as_bytes(),
        };
        let upper = self.verb == 'X';
        let mut out = String::with_capacity(bytes.len() * 2 + 2);
        if self.has('#') {
            out.push_str(if upper { "0X" } else { "0x" });
        }
        for b in bytes {
            if upper {
                out.push_str(&format!("{:02X}", b));
            } else {
                out.push_str(&format!("{:02x}", b));
            }
        }
        out
    }

    /// 按宽度补齐，宽度以字符计
    fn pad(
        &self,
        text: String,
        zero: bool,
    ) -> String {
        let len = text.chars().count();
        let Some(fill) = self.width.filter(|&w| w > len).map(|w| w - len) else {
            return text;
        };
        if self.has('-') {
            text + &" ".repeat(fill)
        } else if zero {
            "0".repeat(fill) + &text
        } else {
            " ".repeat(fill) + &text
        }
    }
}

/// `%e`：指数至少两位并带符号，`1.5e+03`
fn scientific(
    abs: f64,
    precision: usize,
    upper: bool,
) -> String {
    let s = format!("{:.*e}", precision, abs);
    let (mantissa, exp) = split_exponent(&s);
    format!("{}{}", mantissa, exponent(exp, upper))
}

/// `%g`：指数小于 -4 或不小于精度时用指数形式，去掉末尾的 0
fn general(
    abs: f64,
    precision: Option<usize>,
    upper: bool,
) -> String {
    let s = match precision {
        Some(p) => format!("{:.*e}", p.max(1) - 1, abs),
        None => format!("{:e}", abs),
    };
    let (mantissa, exp) = split_exponent(&s);
    let mantissa = trim_zeros(mantissa);
    // 不指定精度时按最短表示，阈值取 6
    let limit = precision.map_or(6, |p| p.max(1) as i32);

    if exp < -4 || exp >= limit {
        format!("{}{}", mantissa, exponent(exp, upper))
    } else {
        let significant = mantissa.chars().filter(char::is_ascii_digit).count() as i32;
        let decimals = (significant - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, abs)).to_string()
    }
}

fn split_exponent(s: &str) -> (&str, i32) {
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn exponent(
    exp: i32,
    upper: bool,
) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    let e = if upper { 'E' } else { 'e' };
    format!("{e}{sign}{:02}", exp.abs())
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
